use std::{cell::RefCell, rc::Rc};

use maze_tracks::SoundId;
use serde::Serialize;

/// Sink for sound effects the maze triggers.
pub trait AudioCallback {
    fn sfx_play(&self, sound: SoundId, volume: i32);
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    SfxPlay { sound: SoundId, volume: i32 },
}

#[derive(Clone, Default)]
pub struct RecordingAudioCallback {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudioCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.borrow().clone()
    }
}

impl AudioCallback for RecordingAudioCallback {
    fn sfx_play(&self, sound: SoundId, volume: i32) {
        self.events
            .borrow_mut()
            .push(AudioEvent::SfxPlay { sound, volume });
    }
}
