use maze_tracks::{ItemId, SoundId};
use serde::Serialize;

/// Observable changes made by the maze, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MazeEvent {
    SceneEntered { scene: String },
    SceneLeft { scene: String, penalty: i32 },
    TrackAdded { item: ItemId, active: bool },
    TrackPaused { item: ItemId },
    TrackResumed { item: ItemId },
    /// The track ran off the end of its program.
    TrackHalted { item: ItemId },
    ItemShown { item: ItemId },
    ItemHidden { item: ItemId },
    ItemRemoved { item: ItemId },
    TargetableChanged { item: ItemId, targetable: bool },
    EnemyChanged { item: ItemId, enemy: bool },
    SoundPlayed { sound: SoundId, volume: i32 },
    /// A target got its shot off before the player reacted.
    PlayerShot { item: ItemId },
    /// An innocent left the stage unharmed.
    InnocentEscaped { item: ItemId },
    TargetHit { item: ItemId, enemy: bool },
    SpinFinished { item: ItemId },
    ScoreChanged { score: i32, delta: i32 },
    CourseCleared,
    MazePaused { paused: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MazeEventRecord {
    pub time_ms: u64,
    #[serde(flatten)]
    pub event: MazeEvent,
}
