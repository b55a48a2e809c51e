//! Legacy flat opcode streams.
//!
//! A stream is a sequence of `i32`: a negative [`Opcode`] tag followed by
//! exactly [`Opcode::operand_count`] operands.

use thiserror::Error;

use crate::ids::{FlagId, ItemId, SoundId, VariableId};
use crate::instruction::{Instruction, Opcode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode tag {tag} at offset {offset}")]
    UnknownOpcode { offset: usize, tag: i32 },
    #[error("{opcode:?} at offset {offset} needs {needed} operands, stream has {available}")]
    Truncated {
        offset: usize,
        opcode: Opcode,
        needed: usize,
        available: usize,
    },
    #[error("operand {value} of {opcode:?} at offset {offset} is out of range")]
    OperandOutOfRange {
        offset: usize,
        opcode: Opcode,
        value: i32,
    },
}

pub fn decode_stream(raw: &[i32]) -> Result<Vec<Instruction>, DecodeError> {
    let mut program = Vec::new();
    let mut offset = 0;
    while offset < raw.len() {
        let tag = raw[offset];
        let opcode =
            Opcode::try_from(tag).map_err(|_| DecodeError::UnknownOpcode { offset, tag })?;
        let needed = opcode.operand_count();
        let operands = raw.get(offset + 1..offset + 1 + needed).ok_or(DecodeError::Truncated {
            offset,
            opcode,
            needed,
            available: raw.len() - offset - 1,
        })?;
        program.push(decode_one(offset, opcode, operands)?);
        offset += 1 + needed;
    }
    Ok(program)
}

fn decode_one(offset: usize, opcode: Opcode, args: &[i32]) -> Result<Instruction, DecodeError> {
    let out_of_range = |value: i32| DecodeError::OperandOutOfRange {
        offset,
        opcode,
        value,
    };
    let item = |value: i32| ItemId::try_from(value).map_err(|_| out_of_range(value));
    let variable = |value: i32| VariableId::try_from(value).map_err(|_| out_of_range(value));
    let flag = |value: i32| FlagId::try_from(value).map_err(|_| out_of_range(value));
    let sound = |value: i32| SoundId::try_from(value).map_err(|_| out_of_range(value));
    let unsigned = |value: i32| u32::try_from(value).map_err(|_| out_of_range(value));

    let instruction = match opcode {
        Opcode::Activate => Instruction::Activate {
            variable: variable(args[0])?,
            max: args[1],
        },
        Opcode::Leave => Instruction::Leave,
        Opcode::Shoot => Instruction::Shoot {
            sound: sound(args[0])?,
            unused: args[1],
        },
        Opcode::EnemyReset => Instruction::EnemyReset {
            item: item(args[0])?,
        },
        Opcode::EnemySet => Instruction::EnemySet {
            item: item(args[0])?,
        },
        Opcode::FlagReset => Instruction::FlagReset {
            flag: flag(args[0])?,
        },
        Opcode::FlagSet => Instruction::FlagSet {
            flag: flag(args[0])?,
        },
        Opcode::VariableDec => Instruction::VariableDec {
            variable: variable(args[0])?,
        },
        Opcode::VariableInc => Instruction::VariableInc {
            variable: variable(args[0])?,
            max: args[1],
        },
        Opcode::VariableReset => Instruction::VariableReset {
            variable: variable(args[0])?,
        },
        Opcode::VariableSet => Instruction::VariableSet {
            variable: variable(args[0])?,
            value: args[1],
        },
        Opcode::TargetSet => Instruction::TargetSet {
            item: item(args[0])?,
            targetable: args[1] != 0,
        },
        Opcode::PausedReset1of3 => Instruction::PausedReset1of3 {
            items: [item(args[0])?, item(args[1])?, item(args[2])?],
        },
        Opcode::PausedReset1of2 => Instruction::PausedReset1of2 {
            items: [item(args[0])?, item(args[1])?],
        },
        Opcode::PausedSet => Instruction::PausedSet {
            item: item(args[0])?,
        },
        Opcode::PausedReset => Instruction::PausedReset {
            item: item(args[0])?,
        },
        Opcode::PlaySound => Instruction::PlaySound {
            sound: sound(args[0])?,
            volume: args[1],
        },
        Opcode::ObstacleReset => Instruction::ObstacleReset {
            item: item(args[0])?,
        },
        Opcode::ObstacleSet => Instruction::ObstacleSet {
            item: item(args[0])?,
        },
        Opcode::WaitRandom => Instruction::WaitRandom {
            min: unsigned(args[0])?,
            max: unsigned(args[1])?,
        },
        Opcode::Rotate => Instruction::Rotate {
            target: args[0],
            delta: args[1],
        },
        Opcode::Facing => Instruction::Facing { angle: args[0] },
        Opcode::Restart => Instruction::Restart,
        Opcode::Wait => Instruction::Wait {
            ms: unsigned(args[0])?,
        },
        Opcode::Move => Instruction::Move {
            point: unsigned(args[0])?,
        },
        Opcode::Position => Instruction::Position {
            point: unsigned(args[0])?,
        },
    };
    Ok(instruction)
}

pub fn encode_stream(program: &[Instruction]) -> Vec<i32> {
    let mut raw = Vec::new();
    for instruction in program {
        raw.push(instruction.opcode() as i32);
        match *instruction {
            Instruction::Leave | Instruction::Restart => {}
            Instruction::Activate { variable, max } | Instruction::VariableInc { variable, max } => {
                raw.extend([variable.raw(), max]);
            }
            Instruction::Shoot { sound, unused } => raw.extend([sound.raw(), unused]),
            Instruction::EnemyReset { item }
            | Instruction::EnemySet { item }
            | Instruction::PausedSet { item }
            | Instruction::PausedReset { item }
            | Instruction::ObstacleReset { item }
            | Instruction::ObstacleSet { item } => raw.push(item.raw()),
            Instruction::FlagReset { flag } | Instruction::FlagSet { flag } => raw.push(flag.raw()),
            Instruction::VariableDec { variable } | Instruction::VariableReset { variable } => {
                raw.push(variable.raw())
            }
            Instruction::VariableSet { variable, value } => raw.extend([variable.raw(), value]),
            Instruction::TargetSet { item, targetable } => {
                raw.extend([item.raw(), i32::from(targetable)])
            }
            Instruction::PausedReset1of3 { items } => raw.extend(items.map(ItemId::raw)),
            Instruction::PausedReset1of2 { items } => raw.extend(items.map(ItemId::raw)),
            Instruction::PlaySound { sound, volume } => raw.extend([sound.raw(), volume]),
            Instruction::WaitRandom { min, max } => raw.extend([clamp_u32(min), clamp_u32(max)]),
            Instruction::Rotate { target, delta } => raw.extend([target, delta]),
            Instruction::Facing { angle } => raw.push(angle),
            Instruction::Wait { ms } => raw.push(clamp_u32(ms)),
            Instruction::Move { point } | Instruction::Position { point } => {
                raw.push(clamp_u32(point))
            }
        }
    }
    raw
}

fn clamp_u32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PS10_TARGET_COUNTER;

    // Shape of a stock pop-up table: gate, count, reveal, fire, hide, hand off.
    const POP_UP: &[i32] = &[
        -26, 10, 20, // activate
        -18, 10, 20, // variable inc
        -9, 0, // obstacle reset
        -5, 989, // facing
        -1, 0, // position
        -7, 3000, 5000, // wait random
        -8, 0, // obstacle set
        -10, 0, 33, // play sound
        -22, 0, // enemy set
        -15, 0, 1, // target set
        -2, 14, // move
        -6, 740, 80, // rotate
        -24, 27, 33, // shoot
        -9, 0, // obstacle reset
        -15, 0, 0, // target set
        -13, 1, 2, // paused reset 1 of 2
        -12, 0, // paused set
        -4, // restart
    ];

    #[test]
    fn decodes_stock_table() {
        let program = decode_stream(POP_UP).expect("decode");
        assert_eq!(program.len(), 18);
        assert_eq!(
            program[0],
            Instruction::Activate {
                variable: PS10_TARGET_COUNTER,
                max: 20
            }
        );
        assert_eq!(
            program[9],
            Instruction::TargetSet {
                item: ItemId(0),
                targetable: true
            }
        );
        assert_eq!(program[17], Instruction::Restart);
    }

    #[test]
    fn re_encoding_reproduces_the_stream() {
        let program = decode_stream(POP_UP).expect("decode");
        assert_eq!(encode_stream(&program), POP_UP);
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = decode_stream(&[-4, 7]).expect_err("7 is not a tag");
        assert_eq!(err, DecodeError::UnknownOpcode { offset: 1, tag: 7 });
    }

    #[test]
    fn rejects_truncated_operands() {
        let err = decode_stream(&[-4, -6, 740]).expect_err("rotate needs two operands");
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 1,
                opcode: Opcode::Rotate,
                needed: 2,
                available: 1,
            }
        );
    }

    #[test]
    fn rejects_negative_item_operands() {
        let err = decode_stream(&[-8, -3]).expect_err("negative item id");
        assert!(matches!(
            err,
            DecodeError::OperandOutOfRange {
                opcode: Opcode::ObstacleSet,
                value: -3,
                ..
            }
        ));
    }

    #[test]
    fn nonzero_target_set_means_targetable() {
        let program = decode_stream(&[-15, 4, 2]).expect("decode");
        assert_eq!(
            program,
            vec![Instruction::TargetSet {
                item: ItemId(4),
                targetable: true
            }]
        );
    }
}
