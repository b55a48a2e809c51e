//! Target-track instruction set.
//!
//! Track tables were historically flat `int` arrays: a negative tag followed
//! by that opcode's operands. Here every opcode is a variant with typed
//! operands; [`crate::stream`] converts between the two forms.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::ids::{FlagId, ItemId, SoundId, VariableId};

/// Raw tags of the legacy opcode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum Opcode {
    Activate = -26,
    Leave = -25,
    Shoot = -24,
    EnemyReset = -23,
    EnemySet = -22,
    FlagReset = -21,
    FlagSet = -20,
    VariableDec = -19,
    VariableInc = -18,
    VariableReset = -17,
    VariableSet = -16,
    TargetSet = -15,
    PausedReset1of3 = -14,
    PausedReset1of2 = -13,
    PausedSet = -12,
    PausedReset = -11,
    PlaySound = -10,
    ObstacleReset = -9,
    ObstacleSet = -8,
    WaitRandom = -7,
    Rotate = -6,
    Facing = -5,
    Restart = -4,
    Wait = -3,
    Move = -2,
    Position = -1,
}

impl Opcode {
    /// Number of integer operands following the tag in a legacy stream.
    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Leave | Opcode::Restart => 0,
            Opcode::EnemyReset
            | Opcode::EnemySet
            | Opcode::FlagReset
            | Opcode::FlagSet
            | Opcode::VariableDec
            | Opcode::VariableReset
            | Opcode::PausedSet
            | Opcode::PausedReset
            | Opcode::ObstacleReset
            | Opcode::ObstacleSet
            | Opcode::Facing
            | Opcode::Wait
            | Opcode::Move
            | Opcode::Position => 1,
            Opcode::Activate
            | Opcode::Shoot
            | Opcode::VariableInc
            | Opcode::VariableSet
            | Opcode::TargetSet
            | Opcode::PausedReset1of2
            | Opcode::PlaySound
            | Opcode::WaitRandom
            | Opcode::Rotate => 2,
            Opcode::PausedReset1of3 => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Activate => "activate",
            Opcode::Leave => "leave",
            Opcode::Shoot => "shoot",
            Opcode::EnemyReset => "enemy_reset",
            Opcode::EnemySet => "enemy_set",
            Opcode::FlagReset => "flag_reset",
            Opcode::FlagSet => "flag_set",
            Opcode::VariableDec => "variable_dec",
            Opcode::VariableInc => "variable_inc",
            Opcode::VariableReset => "variable_reset",
            Opcode::VariableSet => "variable_set",
            Opcode::TargetSet => "target_set",
            Opcode::PausedReset1of3 => "paused_reset_1of3",
            Opcode::PausedReset1of2 => "paused_reset_1of2",
            Opcode::PausedSet => "paused_set",
            Opcode::PausedReset => "paused_reset",
            Opcode::PlaySound => "play_sound",
            Opcode::ObstacleReset => "obstacle_reset",
            Opcode::ObstacleSet => "obstacle_set",
            Opcode::WaitRandom => "wait_random",
            Opcode::Rotate => "rotate",
            Opcode::Facing => "facing",
            Opcode::Restart => "restart",
            Opcode::Wait => "wait",
            Opcode::Move => "move",
            Opcode::Position => "position",
        }
    }
}

impl TryFrom<i32> for Opcode {
    type Error = ();

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            -26 => Ok(Self::Activate),
            -25 => Ok(Self::Leave),
            -24 => Ok(Self::Shoot),
            -23 => Ok(Self::EnemyReset),
            -22 => Ok(Self::EnemySet),
            -21 => Ok(Self::FlagReset),
            -20 => Ok(Self::FlagSet),
            -19 => Ok(Self::VariableDec),
            -18 => Ok(Self::VariableInc),
            -17 => Ok(Self::VariableReset),
            -16 => Ok(Self::VariableSet),
            -15 => Ok(Self::TargetSet),
            -14 => Ok(Self::PausedReset1of3),
            -13 => Ok(Self::PausedReset1of2),
            -12 => Ok(Self::PausedSet),
            -11 => Ok(Self::PausedReset),
            -10 => Ok(Self::PlaySound),
            -9 => Ok(Self::ObstacleReset),
            -8 => Ok(Self::ObstacleSet),
            -7 => Ok(Self::WaitRandom),
            -6 => Ok(Self::Rotate),
            -5 => Ok(Self::Facing),
            -4 => Ok(Self::Restart),
            -3 => Ok(Self::Wait),
            -2 => Ok(Self::Move),
            -1 => Ok(Self::Position),
            _ => Err(()),
        }
    }
}

/// One step of a target track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Pauses the running track once `variable` has reached `max`.
    Activate { variable: VariableId, max: i32 },
    /// Credits an innocent that walked off without being shot.
    Leave,
    /// The target fires at the player. Only lands while it is targetable.
    Shoot {
        sound: SoundId,
        #[serde(default)]
        unused: i32,
    },
    EnemyReset { item: ItemId },
    EnemySet { item: ItemId },
    FlagReset { flag: FlagId },
    FlagSet { flag: FlagId },
    VariableDec { variable: VariableId },
    /// Increments `variable` unless it already reached `max`.
    VariableInc { variable: VariableId, max: i32 },
    VariableReset { variable: VariableId },
    VariableSet { variable: VariableId, value: i32 },
    TargetSet { item: ItemId, targetable: bool },
    #[serde(rename = "paused_reset_1of3")]
    PausedReset1of3 { items: [ItemId; 3] },
    #[serde(rename = "paused_reset_1of2")]
    PausedReset1of2 { items: [ItemId; 2] },
    PausedSet { item: ItemId },
    PausedReset { item: ItemId },
    PlaySound { sound: SoundId, volume: i32 },
    ObstacleReset { item: ItemId },
    ObstacleSet { item: ItemId },
    WaitRandom { min: u32, max: u32 },
    /// Turns by `delta` every update until facing reaches `target`.
    Rotate { target: i32, delta: i32 },
    Facing { angle: i32 },
    Restart,
    Wait { ms: u32 },
    /// Walks one track point per update toward `point`.
    Move { point: u32 },
    Position { point: u32 },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Activate { .. } => Opcode::Activate,
            Instruction::Leave => Opcode::Leave,
            Instruction::Shoot { .. } => Opcode::Shoot,
            Instruction::EnemyReset { .. } => Opcode::EnemyReset,
            Instruction::EnemySet { .. } => Opcode::EnemySet,
            Instruction::FlagReset { .. } => Opcode::FlagReset,
            Instruction::FlagSet { .. } => Opcode::FlagSet,
            Instruction::VariableDec { .. } => Opcode::VariableDec,
            Instruction::VariableInc { .. } => Opcode::VariableInc,
            Instruction::VariableReset { .. } => Opcode::VariableReset,
            Instruction::VariableSet { .. } => Opcode::VariableSet,
            Instruction::TargetSet { .. } => Opcode::TargetSet,
            Instruction::PausedReset1of3 { .. } => Opcode::PausedReset1of3,
            Instruction::PausedReset1of2 { .. } => Opcode::PausedReset1of2,
            Instruction::PausedSet { .. } => Opcode::PausedSet,
            Instruction::PausedReset { .. } => Opcode::PausedReset,
            Instruction::PlaySound { .. } => Opcode::PlaySound,
            Instruction::ObstacleReset { .. } => Opcode::ObstacleReset,
            Instruction::ObstacleSet { .. } => Opcode::ObstacleSet,
            Instruction::WaitRandom { .. } => Opcode::WaitRandom,
            Instruction::Rotate { .. } => Opcode::Rotate,
            Instruction::Facing { .. } => Opcode::Facing,
            Instruction::Restart => Opcode::Restart,
            Instruction::Wait { .. } => Opcode::Wait,
            Instruction::Move { .. } => Opcode::Move,
            Instruction::Position { .. } => Opcode::Position,
        }
    }

    /// Tracks whose paused state this instruction changes.
    pub fn paused_targets(&self) -> &[ItemId] {
        match self {
            Instruction::PausedSet { item } | Instruction::PausedReset { item } => {
                std::slice::from_ref(item)
            }
            Instruction::PausedReset1of2 { items } => items,
            Instruction::PausedReset1of3 { items } => items,
            _ => &[],
        }
    }
}
