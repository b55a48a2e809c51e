use std::rc::Rc;

use maze_tracks::{ItemId, SoundId};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::audio_bridge::AudioCallback;
use crate::events::{MazeEvent, MazeEventRecord};
use crate::items::ItemStore;
use crate::state::GameState;

/// Engine services the maze reads and mutates: game variables, placed items,
/// randomness, audio and the event log.
pub struct MazeWorld {
    pub state: GameState,
    pub items: ItemStore,
    rng: ChaCha8Rng,
    audio: Option<Rc<dyn AudioCallback>>,
    events: Vec<MazeEventRecord>,
    clock_ms: u64,
}

impl MazeWorld {
    pub fn new(seed: u64) -> Self {
        MazeWorld {
            state: GameState::new(),
            items: ItemStore::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            audio: None,
            events: Vec::new(),
            clock_ms: 0,
        }
    }

    pub fn with_audio(mut self, audio: Rc<dyn AudioCallback>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn advance_clock(&mut self, elapsed_ms: u32) {
        self.clock_ms += u64::from(elapsed_ms);
    }

    pub fn record(&mut self, event: MazeEvent) {
        log::trace!("{:>7}ms {:?}", self.clock_ms, event);
        self.events.push(MazeEventRecord {
            time_ms: self.clock_ms,
            event,
        });
    }

    pub fn events(&self) -> &[MazeEventRecord] {
        &self.events
    }

    pub fn play_sound(&mut self, sound: SoundId, volume: i32) {
        if let Some(audio) = self.audio.as_ref() {
            audio.sfx_play(sound, volume);
        }
        self.record(MazeEvent::SoundPlayed { sound, volume });
    }

    pub fn adjust_score(&mut self, delta: i32) -> i32 {
        let score = self.state.adjust_police_maze_score(delta);
        self.record(MazeEvent::ScoreChanged { score, delta });
        score
    }

    /// Uniform draw from `min..=max`; reversed bounds are swapped.
    pub fn random_between(&mut self, min: u32, max: u32) -> u32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(low..=high)
    }

    pub fn choose(&mut self, candidates: &[ItemId]) -> Option<ItemId> {
        candidates.choose(&mut self.rng).copied()
    }

    pub fn set_visible(&mut self, item: ItemId, visible: bool) {
        match self.items.set_obstacle(item, visible) {
            Some(true) => self.record(if visible {
                MazeEvent::ItemShown { item }
            } else {
                MazeEvent::ItemHidden { item }
            }),
            Some(false) => {}
            None => log::warn!("{item} is not in the world; cannot change visibility"),
        }
    }

    pub fn set_targetable(&mut self, item: ItemId, targetable: bool) {
        match self.items.set_target(item, targetable) {
            Some(true) => self.record(MazeEvent::TargetableChanged { item, targetable }),
            Some(false) => {}
            None => log::warn!("{item} is not in the world; cannot flag as target"),
        }
    }

    pub fn set_enemy(&mut self, item: ItemId, enemy: bool) {
        match self.items.set_enemy(item, enemy) {
            Some(true) => self.record(MazeEvent::EnemyChanged { item, enemy }),
            Some(false) => {}
            None => log::warn!("{item} is not in the world; cannot mark enemy"),
        }
    }
}
