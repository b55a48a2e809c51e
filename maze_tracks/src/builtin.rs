//! Course tables shipped with the engine.

mod ps10;
mod ps11;
mod ps12;
mod ps13;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::course::Course;
use crate::ids::{ItemId, SoundId, VariableId};
use crate::instruction::Instruction;

pub const BUILTIN_COURSES: &[&str] = &["ps10", "ps11", "ps12", "ps13"];

pub const SFX_CROSLOCK: SoundId = SoundId(0);
pub const SFX_SPINNY1: SoundId = SoundId(2);
pub const SFX_LGCAL1: SoundId = SoundId(12);
pub const SFX_SMCAL3: SoundId = SoundId(27);

/// Which flavour of the stock tables to build.
///
/// `Original` keeps the shipped 1997 sequences, authoring slips included;
/// `Restored` carries the corrected sequences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RulesVariant {
    Original,
    #[default]
    Restored,
}

pub fn builtin_course(name: &str, rules: RulesVariant) -> Option<Course> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ps10" => Some(ps10::course(rules)),
        "ps11" => Some(ps11::course(rules)),
        "ps12" => Some(ps12::course(rules)),
        "ps13" => Some(ps13::course(rules)),
        _ => None,
    }
}

/// Opening of every stock track: stop once the scene counter is full,
/// otherwise count this life-cycle.
fn life_cycle(counter: VariableId, max: i32) -> [Instruction; 2] {
    [
        Instruction::Activate {
            variable: counter,
            max,
        },
        Instruction::VariableInc {
            variable: counter,
            max,
        },
    ]
}

/// Innocent stepping off stage at the end of its walk.
fn walk_off(item: ItemId, rules: RulesVariant) -> Vec<Instruction> {
    match rules {
        // Credited while still on screen.
        RulesVariant::Original => vec![
            Instruction::Leave,
            Instruction::ObstacleReset { item },
            Instruction::TargetSet {
                item,
                targetable: false,
            },
        ],
        RulesVariant::Restored => vec![
            Instruction::ObstacleReset { item },
            Instruction::Leave,
            Instruction::TargetSet {
                item,
                targetable: false,
            },
        ],
    }
}

/// Closing of a track that hands the stage to `next` and goes dormant.
fn hand_off(item: ItemId, next: Instruction) -> [Instruction; 3] {
    [next, Instruction::PausedSet { item }, Instruction::Restart]
}
