use crate::course::{Course, ItemSpawn, TrackSpec};
use crate::ids::{ItemId, VariableId, Vec3, PS11_TARGET_COUNTER};
use crate::instruction::Instruction;

use super::{hand_off, life_cycle, walk_off, RulesVariant, SFX_CROSLOCK, SFX_SMCAL3};

const TARGET_1: ItemId = ItemId(9);
const TARGET_2: ItemId = ItemId(10);
const TARGET_3: ItemId = ItemId(11);
const TARGET_4: ItemId = ItemId(12);

const TARGET_COUNT: i32 = 8;

// The doorway gunman wakes one of three followers, each of which hands the
// stage back to him.
pub(super) fn course(rules: RulesVariant) -> Course {
    let counter = PS11_TARGET_COUNTER;
    let floor = 0.15;

    Course {
        scene: "PS11".to_string(),
        counter,
        target_count: TARGET_COUNT,
        items: vec![
            ItemSpawn::hidden(TARGET_1, 0),
            ItemSpawn::hidden(TARGET_2, 768),
            ItemSpawn::hidden(TARGET_3, 512),
            ItemSpawn::hidden(TARGET_4, 256),
        ],
        tracks: vec![
            TrackSpec {
                item: TARGET_1,
                start: Vec3::new(591.0, floor, -190.0),
                end: Vec3::new(591.0, floor, -110.0),
                steps: 5,
                program: doorway(counter).into(),
                starts_active: true,
            },
            TrackSpec {
                item: TARGET_2,
                start: Vec3::new(440.0, floor, -340.0),
                end: Vec3::new(720.0, floor, -340.0),
                steps: 8,
                program: crossing(counter, rules).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_3,
                start: Vec3::new(505.0, floor, -420.0),
                end: Vec3::new(505.0, floor, -420.0),
                steps: 1,
                program: turncoat(counter).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_4,
                start: Vec3::new(660.0, floor, -250.0),
                end: Vec3::new(660.0, floor, -250.0),
                steps: 1,
                program: bystander(counter).into(),
                starts_active: false,
            },
        ],
        hit_groups: Vec::new(),
    }
}

fn doorway(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_1;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 1000,
            max: 2000,
        },
        Instruction::ObstacleSet { item },
        Instruction::PlaySound {
            sound: SFX_CROSLOCK,
            volume: 33,
        },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 4 },
        Instruction::Wait { ms: 700 },
        Instruction::Shoot {
            sound: SFX_SMCAL3,
            unused: 33,
        },
        Instruction::Move { point: 0 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
        Instruction::EnemyReset { item },
    ]);
    program.extend(hand_off(
        item,
        Instruction::PausedReset1of3 {
            items: [TARGET_2, TARGET_3, TARGET_4],
        },
    ));
    program
}

fn crossing(counter: VariableId, rules: RulesVariant) -> Vec<Instruction> {
    let item = TARGET_2;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 768 },
        Instruction::Position { point: 0 },
        Instruction::Wait { ms: 300 },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 7 },
    ]);
    program.extend(walk_off(item, rules));
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

// Shows up unarmed, turns, and only then counts as a threat.
fn turncoat(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_3;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 512 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 500,
            max: 1000,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Wait { ms: 400 },
        Instruction::Rotate {
            target: 768,
            delta: 64,
        },
        Instruction::EnemySet { item },
        Instruction::Wait { ms: 600 },
        Instruction::Shoot {
            sound: SFX_SMCAL3,
            unused: 33,
        },
        Instruction::Wait { ms: 300 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
        Instruction::EnemyReset { item },
    ]);
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

fn bystander(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_4;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 256 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 800,
            max: 1600,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Wait { ms: 1200 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
    ]);
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}
