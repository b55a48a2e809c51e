use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::ids::{ItemId, VariableId, Vec3};
use crate::instruction::Instruction;
use crate::stream::{decode_stream, encode_stream, DecodeError};

/// Everything one maze scene registers on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub scene: String,
    /// Variable counting completed target life-cycles in this scene.
    pub counter: VariableId,
    /// Life-cycles a complete run is expected to reach; the shortfall is
    /// charged against the score when the player leaves.
    pub target_count: i32,
    #[serde(default)]
    pub items: Vec<ItemSpawn>,
    pub tracks: Vec<TrackSpec>,
    /// Items that are the same physical target seen through different tracks.
    #[serde(default)]
    pub hit_groups: Vec<Vec<ItemId>>,
}

/// Arguments of the scene's initial `Item_Add_To_World` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub item: ItemId,
    #[serde(default)]
    pub animation: u32,
    #[serde(default)]
    pub facing: i32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub targetable: bool,
    #[serde(default)]
    pub obstacle: bool,
    #[serde(default)]
    pub enemy: bool,
}

impl ItemSpawn {
    pub fn hidden(item: ItemId, facing: i32) -> Self {
        ItemSpawn {
            item,
            animation: 0,
            facing,
            height: 72,
            width: 36,
            targetable: false,
            obstacle: false,
            enemy: false,
        }
    }
}

/// Arguments of one `Police_Maze_Target_Track_Add` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub item: ItemId,
    pub start: Vec3,
    pub end: Vec3,
    /// Number of points the start-to-end segment is divided into.
    pub steps: u32,
    pub program: Program,
    #[serde(default)]
    pub starts_active: bool,
}

impl TrackSpec {
    /// Evenly spaced points from `start` to `end`, both included.
    pub fn points(&self) -> Vec<Vec3> {
        if self.steps <= 1 {
            return vec![self.start];
        }
        let last = (self.steps - 1) as f32;
        (0..self.steps)
            .map(|index| self.start.lerp(self.end, index as f32 / last))
            .collect()
    }
}

/// Decoded instruction list; reads either typed JSON instructions or a
/// legacy integer stream, and always writes the typed form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProgramSource", into = "ProgramSource")]
pub struct Program(Vec<Instruction>);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ProgramSource {
    Typed(Vec<Instruction>),
    Raw(Vec<i32>),
}

impl TryFrom<ProgramSource> for Program {
    type Error = DecodeError;

    fn try_from(source: ProgramSource) -> Result<Self, Self::Error> {
        match source {
            ProgramSource::Typed(instructions) => Ok(Program(instructions)),
            ProgramSource::Raw(raw) => Program::from_raw(&raw),
        }
    }
}

impl From<Program> for ProgramSource {
    fn from(program: Program) -> Self {
        ProgramSource::Typed(program.0)
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Program(instructions)
    }
}

impl Program {
    pub fn from_raw(raw: &[i32]) -> Result<Self, DecodeError> {
        decode_stream(raw).map(Program)
    }

    pub fn to_raw(&self) -> Vec<i32> {
        encode_stream(&self.0)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Course {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing course JSON")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading course file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing course file {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing course to JSON")
    }

    pub fn track(&self, item: ItemId) -> Option<&TrackSpec> {
        self.tracks.iter().find(|track| track.item == item)
    }

    pub fn spawn(&self, item: ItemId) -> Option<&ItemSpawn> {
        self.items.iter().find(|spawn| spawn.item == item)
    }

    /// Every item the scene places, from spawns and tracks alike.
    pub fn item_ids(&self) -> BTreeSet<ItemId> {
        self.items
            .iter()
            .map(|spawn| spawn.item)
            .chain(self.tracks.iter().map(|track| track.item))
            .collect()
    }

    /// Items sharing a physical target with `item`, including `item` itself.
    pub fn hit_group(&self, item: ItemId) -> Vec<ItemId> {
        self.hit_groups
            .iter()
            .find(|group| group.contains(&item))
            .cloned()
            .unwrap_or_else(|| vec![item])
    }
}

/// Loads every `*.json` course below `root`, in path order.
pub fn load_course_dir(root: &Path) -> Result<Vec<Course>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|res| res.ok()) {
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    log::debug!("found {} course files under {}", paths.len(), root.display());

    paths
        .iter()
        .map(|path| Course::from_json_file(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PS10_TARGET_COUNTER;
    use tempfile::tempdir;

    fn sample_json() -> &'static str {
        r#"{
            "scene": "PS10",
            "counter": 10,
            "target_count": 4,
            "items": [{ "item": 0, "facing": 200 }],
            "tracks": [
                {
                    "item": 0,
                    "start": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "end": { "x": 10.0, "y": 0.0, "z": 0.0 },
                    "steps": 3,
                    "program": [-8, 0, -3, 500, -9, 0, -4],
                    "starts_active": true
                },
                {
                    "item": 1,
                    "start": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "end": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "steps": 1,
                    "program": [{ "op": "wait", "ms": 10 }, { "op": "restart" }]
                }
            ],
            "hit_groups": [[0, 1]]
        }"#
    }

    #[test]
    fn parses_raw_and_typed_programs() {
        let course = Course::from_json_str(sample_json()).expect("parse course");
        assert_eq!(course.counter, PS10_TARGET_COUNTER);
        assert_eq!(
            course.tracks[0].program.instructions(),
            &[
                Instruction::ObstacleSet { item: ItemId(0) },
                Instruction::Wait { ms: 500 },
                Instruction::ObstacleReset { item: ItemId(0) },
                Instruction::Restart,
            ]
        );
        assert_eq!(course.tracks[1].program.len(), 2);
        assert!(!course.tracks[1].starts_active);
    }

    #[test]
    fn bad_raw_programs_fail_to_parse() {
        let json = sample_json().replace("[-8, 0, -3, 500, -9, 0, -4]", "[-8, 0, 99]");
        assert!(Course::from_json_str(&json).is_err());
    }

    #[test]
    fn serializes_programs_in_typed_form() {
        let course = Course::from_json_str(sample_json()).expect("parse course");
        let json = course.to_json_pretty().expect("serialize");
        assert!(json.contains(r#""op": "obstacle_set""#));
        let reparsed = Course::from_json_str(&json).expect("reparse");
        assert_eq!(reparsed, course);
    }

    #[test]
    fn points_span_start_to_end() {
        let course = Course::from_json_str(sample_json()).expect("parse course");
        let points = course.tracks[0].points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(points[2], Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(course.tracks[1].points(), vec![Vec3::default()]);
    }

    #[test]
    fn hit_groups_fall_back_to_single_item() {
        let course = Course::from_json_str(sample_json()).expect("parse course");
        assert_eq!(course.hit_group(ItemId(1)), vec![ItemId(0), ItemId(1)]);
        assert_eq!(course.hit_group(ItemId(7)), vec![ItemId(7)]);
        assert_eq!(
            course.item_ids().into_iter().collect::<Vec<_>>(),
            vec![ItemId(0), ItemId(1)]
        );
    }

    #[test]
    fn loads_course_directories_in_path_order() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested)?;
        let second = sample_json().replace("PS10", "PS11");
        fs::write(nested.join("b.json"), second)?;
        fs::write(dir.path().join("a.json"), sample_json())?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;

        let courses = load_course_dir(dir.path())?;
        let scenes: Vec<&str> = courses.iter().map(|c| c.scene.as_str()).collect();
        assert_eq!(scenes, vec!["PS10", "PS11"]);
        Ok(())
    }
}
