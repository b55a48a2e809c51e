//! Target-track interpreter.
//!
//! Each maze target runs a looping [`Program`](maze_tracks::Program) that
//! reveals, moves, rotates and hides it. Tracks advance on a fixed cadence,
//! in item order, and coordinate through pause/resume requests that the maze
//! applies as soon as the requesting track has finished its update.

mod track;

use std::collections::BTreeMap;

use maze_tracks::{ItemId, ItemSpawn, TrackSpec};
use serde::Serialize;

use crate::config::DEFAULT_UPDATE_INTERVAL_MS;
use crate::events::MazeEvent;
use crate::world::MazeWorld;

use self::track::{TargetTrack, TrackEffect};
pub use self::track::TrackSnapshot;

/// Where a target is in its reveal cycle, derived from track and item state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPhase {
    Dormant,
    Arming,
    Revealed,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MazeSnapshot {
    pub active: bool,
    pub paused: bool,
    pub tracks: Vec<TrackSnapshot>,
}

#[derive(Debug)]
pub struct PoliceMaze {
    tracks: BTreeMap<ItemId, TargetTrack>,
    active: bool,
    paused: bool,
    since_update_ms: u32,
    update_interval_ms: u32,
}

impl Default for PoliceMaze {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL_MS)
    }
}

impl PoliceMaze {
    pub fn new(update_interval_ms: u32) -> Self {
        PoliceMaze {
            tracks: BTreeMap::new(),
            active: false,
            paused: false,
            since_update_ms: 0,
            update_interval_ms: update_interval_ms.max(1),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Registers the track for `spec.item`, replacing any earlier one. An
    /// item missing from the world is placed hidden at the first point.
    pub fn add_track(&mut self, world: &mut MazeWorld, spec: &TrackSpec) {
        let item = spec.item;
        let mut track = TargetTrack::new(spec);
        if !world.items.is_present(item) {
            log::debug!("{item} has no spawn; placing it hidden");
            world
                .items
                .add_to_world(&ItemSpawn::hidden(item, 0), track.first_point());
        }

        let active = !track.is_paused();
        world.record(MazeEvent::TrackAdded { item, active });
        if active {
            let mut effects = Vec::new();
            track.update(world, 0, &mut effects);
            self.tracks.insert(item, track);
            self.apply_effects(world, effects);
        } else {
            self.tracks.insert(item, track);
        }
        self.active = true;
    }

    /// Advances the maze by `elapsed_ms` of game time.
    pub fn tick(&mut self, world: &mut MazeWorld, elapsed_ms: u32) {
        world.advance_clock(elapsed_ms);
        if self.paused {
            return;
        }

        self.since_update_ms = self.since_update_ms.saturating_add(elapsed_ms);
        if self.since_update_ms < self.update_interval_ms {
            return;
        }
        let step_ms = std::mem::take(&mut self.since_update_ms);

        for item in world.items.advance_spins() {
            world.record(MazeEvent::SpinFinished { item });
        }

        let ids: Vec<ItemId> = self.tracks.keys().copied().collect();
        for id in ids {
            let mut effects = Vec::new();
            if let Some(track) = self.tracks.get_mut(&id) {
                track.update(world, step_ms, &mut effects);
            }
            self.apply_effects(world, effects);
        }

        if self.active
            && !self.tracks.is_empty()
            && self
                .tracks
                .values()
                .all(|track| track.is_paused() || track.is_halted())
        {
            self.active = false;
            log::info!("every target is dormant; course cleared");
            world.record(MazeEvent::CourseCleared);
        }
    }

    fn apply_effects(&mut self, world: &mut MazeWorld, effects: Vec<TrackEffect>) {
        for effect in effects {
            match effect {
                TrackEffect::Pause(item) => self.set_track_paused(world, item, true),
                TrackEffect::Resume(item) => self.set_track_paused(world, item, false),
                TrackEffect::ResumeOneOf(candidates) => {
                    let dormant: Vec<ItemId> = candidates
                        .iter()
                        .copied()
                        .filter(|item| match self.tracks.get(item) {
                            Some(track) => track.is_paused(),
                            None => {
                                log::warn!("wake request names {item}, which has no track");
                                false
                            }
                        })
                        .collect();
                    match world.choose(&dormant) {
                        Some(item) => self.set_track_paused(world, item, false),
                        None => log::debug!("no dormant track among {candidates:?}"),
                    }
                }
            }
        }
    }

    fn set_track_paused(&mut self, world: &mut MazeWorld, item: ItemId, paused: bool) {
        let Some(track) = self.tracks.get_mut(&item) else {
            log::warn!("pause request for {item}, which has no track");
            return;
        };
        if track.set_paused(paused) {
            world.record(if paused {
                MazeEvent::TrackPaused { item }
            } else {
                MazeEvent::TrackResumed { item }
            });
        }
    }

    /// Player hit on `item`. Returns `false` when the item was not a live
    /// target. The track keeps its resume point and holds until the spin ends.
    pub fn on_hit(&mut self, world: &mut MazeWorld, item: ItemId) -> bool {
        if !world.items.is_target(item) {
            return false;
        }
        let enemy = world.items.is_enemy(item);
        world.set_targetable(item, false);
        world.items.spin_in_world(item);
        world.record(MazeEvent::TargetHit { item, enemy });
        world.adjust_score(if enemy { 1 } else { -1 });
        true
    }

    pub fn set_paused(&mut self, world: &mut MazeWorld, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            world.record(MazeEvent::MazePaused { paused });
        }
    }

    /// Drops every track and resets the cadence.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.active = false;
        self.paused = false;
        self.since_update_ms = 0;
    }

    pub fn phase(&self, world: &MazeWorld, item: ItemId) -> Option<TargetPhase> {
        let track = self.tracks.get(&item)?;
        let visible = world.items.is_visible(item);
        let phase = if world.items.is_spinning(item) {
            TargetPhase::Resolved
        } else if visible && world.items.is_target(item) {
            TargetPhase::Revealed
        } else if visible {
            TargetPhase::Resolved
        } else if track.is_paused() || track.is_halted() {
            TargetPhase::Dormant
        } else {
            TargetPhase::Arming
        };
        Some(phase)
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.tracks.values().map(|track| track.item())
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            active: self.active,
            paused: self.paused,
            tracks: self.tracks.values().map(TargetTrack::snapshot).collect(),
        }
    }
}
