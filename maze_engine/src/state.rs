use std::collections::{BTreeMap, BTreeSet};

use maze_tracks::{FlagId, VariableId, POLICE_MAZE_SCORE};
use serde::Serialize;

/// Persisted game variables and flags the maze reads and writes.
///
/// Unset variables read as zero and unset flags as false, matching a fresh
/// save.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    variables: BTreeMap<VariableId, i32>,
    flags: BTreeSet<FlagId>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self, variable: VariableId) -> i32 {
        self.variables.get(&variable).copied().unwrap_or(0)
    }

    pub fn set(&mut self, variable: VariableId, value: i32) {
        if value == 0 {
            self.variables.remove(&variable);
        } else {
            self.variables.insert(variable, value);
        }
    }

    pub fn increment(&mut self, variable: VariableId, by: i32) -> i32 {
        let value = self.query(variable).saturating_add(by);
        self.set(variable, value);
        value
    }

    pub fn decrement(&mut self, variable: VariableId, by: i32) -> i32 {
        self.increment(variable, by.saturating_neg())
    }

    pub fn reset(&mut self, variable: VariableId) {
        self.variables.remove(&variable);
    }

    #[cfg(test)]
    pub fn flag(&self, flag: FlagId) -> bool {
        self.flags.contains(&flag)
    }

    pub fn set_flag(&mut self, flag: FlagId) {
        self.flags.insert(flag);
    }

    pub fn reset_flag(&mut self, flag: FlagId) {
        self.flags.remove(&flag);
    }

    pub fn police_maze_score(&self) -> i32 {
        self.query(POLICE_MAZE_SCORE)
    }

    pub fn adjust_police_maze_score(&mut self, delta: i32) -> i32 {
        self.increment(POLICE_MAZE_SCORE, delta)
    }

    #[cfg(test)]
    pub fn zero_police_maze_score(&mut self) {
        self.reset(POLICE_MAZE_SCORE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_tracks::PS10_TARGET_COUNTER;

    #[test]
    fn unset_values_read_as_defaults() {
        let state = GameState::new();
        assert_eq!(state.query(PS10_TARGET_COUNTER), 0);
        assert!(!state.flag(FlagId(157)));
    }

    #[test]
    fn variables_increment_and_reset() {
        let mut state = GameState::new();
        assert_eq!(state.increment(PS10_TARGET_COUNTER, 1), 1);
        assert_eq!(state.increment(PS10_TARGET_COUNTER, 2), 3);
        assert_eq!(state.decrement(PS10_TARGET_COUNTER, 4), -1);
        state.reset(PS10_TARGET_COUNTER);
        assert_eq!(state.query(PS10_TARGET_COUNTER), 0);
    }

    #[test]
    fn zero_values_are_not_stored() {
        let mut state = GameState::new();
        state.set(PS10_TARGET_COUNTER, 5);
        state.set(PS10_TARGET_COUNTER, 0);
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn flags_toggle() {
        let mut state = GameState::new();
        state.set_flag(FlagId(3));
        assert!(state.flag(FlagId(3)));
        state.reset_flag(FlagId(3));
        assert!(!state.flag(FlagId(3)));
    }

    #[test]
    fn score_goes_negative() {
        let mut state = GameState::new();
        state.adjust_police_maze_score(2);
        assert_eq!(state.adjust_police_maze_score(-5), -3);
        assert_eq!(state.police_maze_score(), -3);
        state.zero_police_maze_score();
        assert_eq!(state.police_maze_score(), 0);
    }

    #[test]
    fn serializes_variables_by_id() {
        let mut state = GameState::new();
        state.set(POLICE_MAZE_SCORE, 7);
        let value = serde_json::to_value(&state).expect("serialize");
        assert_eq!(value["variables"]["9"], 7);
    }
}
