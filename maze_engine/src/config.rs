use maze_tracks::RulesVariant;
use serde::Serialize;

pub const DEFAULT_SEED: u64 = 42;
/// Track update cadence; roughly 15 updates per second.
pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MazeConfig {
    pub seed: u64,
    pub update_interval_ms: u32,
    pub rules: RulesVariant,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            seed: DEFAULT_SEED,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            rules: RulesVariant::default(),
        }
    }
}
