//! Simulated player for headless runs.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use maze_tracks::ItemId;
use serde::Serialize;

use crate::maze::TargetPhase;
use crate::scene::MazeSession;

/// A click on `item` once the session clock reaches `at_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledShot {
    pub item: ItemId,
    pub at_ms: u64,
}

impl ScheduledShot {
    /// Parses `ITEM@MS`, e.g. `4@2500`.
    pub fn parse(value: &str) -> Result<Self> {
        let (item, at) = value
            .split_once('@')
            .ok_or_else(|| anyhow!("expected ITEM@MS, got {value:?}"))?;
        let item: u16 = item
            .trim()
            .parse()
            .with_context(|| format!("invalid item id in shot {value:?}"))?;
        let at_ms: u64 = at
            .trim()
            .parse()
            .with_context(|| format!("invalid time in shot {value:?}"))?;
        Ok(ScheduledShot {
            item: ItemId(item),
            at_ms,
        })
    }
}

/// Holds the maze paused for `duration_ms` from `at_ms` on the run clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PauseWindow {
    pub at_ms: u64,
    pub duration_ms: u64,
}

impl PauseWindow {
    /// Parses `MS:DURATION`, e.g. `5000:1500`.
    pub fn parse(value: &str) -> Result<Self> {
        let (at, duration) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("expected MS:DURATION, got {value:?}"))?;
        let at_ms: u64 = at
            .trim()
            .parse()
            .with_context(|| format!("invalid start in pause {value:?}"))?;
        let duration_ms: u64 = duration
            .trim()
            .parse()
            .with_context(|| format!("invalid duration in pause {value:?}"))?;
        Ok(PauseWindow { at_ms, duration_ms })
    }

    pub fn covers(&self, now_ms: u64) -> bool {
        now_ms >= self.at_ms && now_ms - self.at_ms < self.duration_ms
    }
}

/// Shoots every revealed enemy once it has been on screen for the reaction
/// time, and never shoots innocents.
#[derive(Debug, Clone)]
pub struct Marksman {
    reaction_ms: u64,
    sighted: BTreeMap<ItemId, u64>,
}

impl Marksman {
    pub fn new(reaction_ms: u64) -> Self {
        Marksman {
            reaction_ms,
            sighted: BTreeMap::new(),
        }
    }

    /// Items to shoot at the session's current time.
    pub fn aim(&mut self, session: &MazeSession) -> Vec<ItemId> {
        let now = session.clock_ms();
        let mut ready = Vec::new();
        for item in session.tracked_items() {
            let exposed = session.phase(item) == Some(TargetPhase::Revealed)
                && session.is_enemy(item);
            if !exposed {
                self.sighted.remove(&item);
                continue;
            }
            let since = *self.sighted.entry(item).or_insert(now);
            if now.saturating_sub(since) >= self.reaction_ms {
                ready.push(item);
            }
        }
        for item in &ready {
            self.sighted.remove(item);
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MazeConfig;
    use maze_tracks::{Course, Instruction, ItemSpawn, TrackSpec, Vec3, VariableId};

    #[test]
    fn parses_item_and_time() {
        let shot = ScheduledShot::parse("4@2500").expect("valid shot");
        assert_eq!(
            shot,
            ScheduledShot {
                item: ItemId(4),
                at_ms: 2500,
            }
        );
    }

    #[test]
    fn rejects_malformed_shots() {
        assert!(ScheduledShot::parse("4").is_err());
        assert!(ScheduledShot::parse("x@10").is_err());
        assert!(ScheduledShot::parse("4@soon").is_err());
        assert!(ScheduledShot::parse("70000@1").is_err());
    }

    #[test]
    fn pause_windows_cover_a_half_open_range() {
        let window = PauseWindow::parse("1000:500").expect("valid pause");
        assert!(!window.covers(999));
        assert!(window.covers(1000));
        assert!(window.covers(1499));
        assert!(!window.covers(1500));
        assert!(PauseWindow::parse("1000").is_err());
        assert!(PauseWindow::parse("1000:long").is_err());
    }

    fn pop_up_course(enemy: bool) -> Course {
        let item = ItemId(0);
        let polarity = if enemy {
            Instruction::EnemySet { item }
        } else {
            Instruction::EnemyReset { item }
        };
        Course {
            scene: "TEST".to_string(),
            counter: VariableId(10),
            target_count: 1,
            items: vec![ItemSpawn::hidden(item, 0)],
            tracks: vec![TrackSpec {
                item,
                start: Vec3::default(),
                end: Vec3::default(),
                steps: 1,
                program: vec![
                    Instruction::ObstacleSet { item },
                    polarity,
                    Instruction::TargetSet {
                        item,
                        targetable: true,
                    },
                    Instruction::Wait { ms: 5000 },
                    Instruction::Restart,
                ]
                .into(),
                starts_active: true,
            }],
            hit_groups: Vec::new(),
        }
    }

    #[test]
    fn marksman_waits_out_the_reaction_time() {
        let mut session = MazeSession::new(&MazeConfig::default(), None);
        session.enter(pop_up_course(true));
        let mut marksman = Marksman::new(200);

        assert!(marksman.aim(&session).is_empty());
        session.tick(100);
        assert!(marksman.aim(&session).is_empty());
        session.tick(100);
        assert_eq!(marksman.aim(&session), vec![ItemId(0)]);
    }

    #[test]
    fn marksman_spares_innocents() {
        let mut session = MazeSession::new(&MazeConfig::default(), None);
        session.enter(pop_up_course(false));
        let mut marksman = Marksman::new(0);
        assert!(marksman.aim(&session).is_empty());
    }
}
