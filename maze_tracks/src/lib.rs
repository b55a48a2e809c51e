pub mod builtin;
pub mod course;
pub mod ids;
pub mod instruction;
pub mod lint;
pub mod stream;

pub use builtin::{builtin_course, RulesVariant, BUILTIN_COURSES};
pub use course::{load_course_dir, Course, ItemSpawn, Program, TrackSpec};
pub use ids::{
    normalize_facing, FlagId, ItemId, SoundId, VariableId, Vec3, FACING_FULL_TURN,
    POLICE_MAZE_SCORE, PS10_TARGET_COUNTER, PS11_TARGET_COUNTER, PS12_TARGET_COUNTER,
    PS13_TARGET_COUNTER,
};
pub use instruction::{Instruction, Opcode};
pub use lint::{lint_course, Finding, FindingKind};
pub use stream::{decode_stream, encode_stream, DecodeError};
