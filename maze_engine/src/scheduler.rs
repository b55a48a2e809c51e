use std::collections::VecDeque;

use serde::Serialize;

use crate::player::ScheduledShot;

/// Scripted shots in firing order. Shots with equal times keep the order
/// they were given in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShotScheduler {
    pending: VecDeque<ScheduledShot>,
    history: Vec<ScheduledShot>,
}

impl ShotScheduler {
    pub fn new<S>(shots: S) -> Self
    where
        S: IntoIterator<Item = ScheduledShot>,
    {
        let mut shots: Vec<ScheduledShot> = shots.into_iter().collect();
        shots.sort_by_key(|shot| shot.at_ms);
        ShotScheduler {
            pending: shots.into(),
            history: Vec::new(),
        }
    }

    /// Pops every shot due at or before `now_ms`.
    pub fn due(&mut self, now_ms: u64) -> Vec<ScheduledShot> {
        let mut due = Vec::new();
        while self
            .pending
            .front()
            .map(|shot| shot.at_ms <= now_ms)
            .unwrap_or(false)
        {
            if let Some(shot) = self.pending.pop_front() {
                self.history.push(shot);
                due.push(shot);
            }
        }
        due
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<&ScheduledShot> {
        self.pending.front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn history(&self) -> &[ScheduledShot] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_tracks::ItemId;

    fn shot(item: u16, at_ms: u64) -> ScheduledShot {
        ScheduledShot {
            item: ItemId(item),
            at_ms,
        }
    }

    #[test]
    fn shots_fire_in_time_order() {
        let mut scheduler = ShotScheduler::new(vec![shot(1, 300), shot(2, 100), shot(3, 100)]);
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.peek(), Some(&shot(2, 100)));

        assert!(scheduler.due(99).is_empty());
        assert_eq!(scheduler.due(150), vec![shot(2, 100), shot(3, 100)]);
        assert_eq!(scheduler.due(1000), vec![shot(1, 300)]);

        assert!(scheduler.is_empty());
        assert_eq!(scheduler.history().len(), 3);
    }
}
