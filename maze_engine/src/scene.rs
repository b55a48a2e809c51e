use std::rc::Rc;

use maze_tracks::{builtin::SFX_SPINNY1, Course, ItemId, ItemSpawn, Vec3};
use serde::Serialize;

use crate::audio_bridge::AudioCallback;
use crate::config::MazeConfig;
use crate::events::{MazeEvent, MazeEventRecord};
use crate::items::Item;
use crate::maze::{MazeSnapshot, PoliceMaze, TargetPhase};
use crate::state::GameState;
use crate::world::MazeWorld;

const SPIN_SOUND_VOLUME: i32 = 12;

/// Result of walking out of a maze scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveSummary {
    pub scene: String,
    pub counter: i32,
    pub target_count: i32,
    /// Points deducted for targets the player never let appear.
    pub penalty: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub scene: Option<String>,
    pub clock_ms: u64,
    pub score: i32,
    pub state: GameState,
    pub items: Vec<Item>,
    pub maze: MazeSnapshot,
}

/// The maze as a set of scenes: course entry and exit, player clicks, and
/// the shared game state the score lives in.
pub struct MazeSession {
    world: MazeWorld,
    maze: PoliceMaze,
    course: Option<Course>,
}

impl MazeSession {
    pub fn new(config: &MazeConfig, audio: Option<Rc<dyn AudioCallback>>) -> Self {
        let world = MazeWorld::new(config.seed);
        let world = match audio {
            Some(audio) => world.with_audio(audio),
            None => world,
        };
        MazeSession {
            world,
            maze: PoliceMaze::new(config.update_interval_ms),
            course: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.world.state
    }

    pub fn clock_ms(&self) -> u64 {
        self.world.clock_ms()
    }

    pub fn events(&self) -> &[MazeEventRecord] {
        self.world.events()
    }

    #[cfg(test)]
    pub fn maze(&self) -> &PoliceMaze {
        &self.maze
    }

    pub fn phase(&self, item: ItemId) -> Option<TargetPhase> {
        self.maze.phase(&self.world, item)
    }

    pub fn is_enemy(&self, item: ItemId) -> bool {
        self.world.items.is_enemy(item)
    }

    /// Places the course's items and registers its tracks. A scene that is
    /// still entered is left first.
    pub fn enter(&mut self, course: Course) {
        if self.course.is_some() {
            self.leave();
        }
        log::info!(
            "entering {} with {} tracks",
            course.scene,
            course.tracks.len()
        );

        self.world.state.reset(course.counter);
        self.world.record(MazeEvent::SceneEntered {
            scene: course.scene.clone(),
        });

        for item in course.item_ids() {
            let spawn = course
                .spawn(item)
                .cloned()
                .unwrap_or_else(|| ItemSpawn::hidden(item, 0));
            let position = course
                .track(item)
                .and_then(|track| track.points().first().copied())
                .unwrap_or_default();
            self.world.items.add_to_world(&spawn, position);
        }
        for track in &course.tracks {
            self.maze.add_track(&mut self.world, track);
        }
        self.course = Some(course);
    }

    /// Player click on `item`. Outside combat mode clicks never count.
    pub fn clicked_on_item(&mut self, item: ItemId, combat_mode: bool) -> bool {
        if !combat_mode {
            return false;
        }
        if !self.world.items.is_visible(item) || !self.world.items.is_target(item) {
            log::debug!("{item} clicked but is not a live target");
            return false;
        }

        self.world.play_sound(SFX_SPINNY1, SPIN_SOUND_VOLUME);
        if !self.maze.on_hit(&mut self.world, item) {
            return false;
        }
        let group = self
            .course
            .as_ref()
            .map(|course| course.hit_group(item))
            .unwrap_or_default();
        for other in group.into_iter().filter(|other| *other != item) {
            self.world.set_targetable(other, false);
        }
        true
    }

    /// Charges the missed-target penalty and tears the scene down. Returns
    /// `None` when no scene is entered.
    pub fn leave(&mut self) -> Option<LeaveSummary> {
        let course = self.course.take()?;
        let counter = self.world.state.query(course.counter);
        let penalty = (course.target_count - counter).max(0);
        if penalty > 0 {
            self.world.adjust_score(-penalty);
        }

        for item in course.item_ids() {
            if self.world.items.remove(item).is_some() {
                self.world.record(MazeEvent::ItemRemoved { item });
            }
        }
        self.maze.clear();
        self.world.record(MazeEvent::SceneLeft {
            scene: course.scene.clone(),
            penalty,
        });
        log::info!("left {} (counter {counter}, penalty {penalty})", course.scene);

        Some(LeaveSummary {
            scene: course.scene,
            counter,
            target_count: course.target_count,
            penalty,
            score: self.world.state.police_maze_score(),
        })
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.maze.tick(&mut self.world, elapsed_ms);
    }

    /// Global maze pause; the clock keeps running but tracks hold.
    pub fn set_paused(&mut self, paused: bool) {
        self.maze.set_paused(&mut self.world, paused);
    }

    pub fn is_paused(&self) -> bool {
        self.maze.is_paused()
    }

    /// Items with a track, in update order.
    pub fn tracked_items(&self) -> Vec<ItemId> {
        self.maze.items().collect()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            scene: self.course.as_ref().map(|course| course.scene.clone()),
            clock_ms: self.world.clock_ms(),
            score: self.world.state.police_maze_score(),
            state: self.world.state.clone(),
            items: self.world.items.iter().cloned().collect(),
            maze: self.maze.snapshot(),
        }
    }
}
