use std::fmt;

use serde::{Deserialize, Serialize};

/// Facing values wrap at this many units (one full turn).
pub const FACING_FULL_TURN: i32 = 1024;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u16);

        impl $name {
            pub fn raw(self) -> i32 {
                i32::from(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                u16::try_from(value).map($name)
            }
        }
    };
}

id_type!(
    /// Placeable world item; every maze target is one.
    ItemId,
    "item#"
);
id_type!(
    /// Slot in the persisted integer variable store.
    VariableId,
    "var#"
);
id_type!(FlagId, "flag#");
id_type!(SoundId, "sfx#");

pub const POLICE_MAZE_SCORE: VariableId = VariableId(9);
pub const PS10_TARGET_COUNTER: VariableId = VariableId(10);
pub const PS11_TARGET_COUNTER: VariableId = VariableId(11);
pub const PS12_TARGET_COUNTER: VariableId = VariableId(12);
pub const PS13_TARGET_COUNTER: VariableId = VariableId(13);

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Linear interpolation; `t` of 0 yields `self`, 1 yields `other`.
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

/// Folds any facing value onto the `0..FACING_FULL_TURN` circle.
pub fn normalize_facing(facing: i32) -> i32 {
    facing.rem_euclid(FACING_FULL_TURN)
}
