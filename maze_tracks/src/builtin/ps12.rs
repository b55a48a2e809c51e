use crate::course::{Course, ItemSpawn, TrackSpec};
use crate::ids::{ItemId, VariableId, Vec3, PS12_TARGET_COUNTER};
use crate::instruction::Instruction;

use super::{
    hand_off, life_cycle, walk_off, RulesVariant, SFX_CROSLOCK, SFX_LGCAL1, SFX_SMCAL3,
};

const TARGET_1: ItemId = ItemId(29);
const TARGET_2: ItemId = ItemId(30);
const TARGET_3: ItemId = ItemId(31);
const TARGET_4: ItemId = ItemId(32);
const TARGET_5: ItemId = ItemId(33);

const TARGET_COUNT: i32 = 12;

// The balcony gunman wakes either the janitor or the crouching gunman below;
// both hand the stage back. The loading bay pair alternates on its own.
pub(super) fn course(rules: RulesVariant) -> Course {
    let counter = PS12_TARGET_COUNTER;
    let floor = -0.31;

    Course {
        scene: "PS12".to_string(),
        counter,
        target_count: TARGET_COUNT,
        items: vec![
            ItemSpawn::hidden(TARGET_1, 256),
            ItemSpawn::hidden(TARGET_2, 768),
            ItemSpawn::hidden(TARGET_3, 0),
            ItemSpawn::hidden(TARGET_4, 900),
            ItemSpawn::hidden(TARGET_5, 512),
        ],
        tracks: vec![
            TrackSpec {
                item: TARGET_1,
                start: Vec3::new(-420.0, 84.0, 360.0),
                end: Vec3::new(-420.0, 84.0, 360.0),
                steps: 1,
                program: balcony(counter).into(),
                starts_active: true,
            },
            TrackSpec {
                item: TARGET_2,
                start: Vec3::new(-560.0, floor, 180.0),
                end: Vec3::new(-260.0, floor, 180.0),
                steps: 6,
                program: janitor(counter, rules).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_3,
                start: Vec3::new(-380.0, floor, 240.0),
                end: Vec3::new(-380.0, floor, 200.0),
                steps: 3,
                program: crouching(counter).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_4,
                start: Vec3::new(-120.0, floor, 520.0),
                end: Vec3::new(-120.0, floor, 520.0),
                steps: 1,
                program: bay_enemy(counter).into(),
                starts_active: true,
            },
            TrackSpec {
                item: TARGET_5,
                start: Vec3::new(-120.0, floor, 520.0),
                end: Vec3::new(-120.0, floor, 520.0),
                steps: 1,
                program: bay_innocent(counter).into(),
                starts_active: false,
            },
        ],
        hit_groups: Vec::new(),
    }
}

fn balcony(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_1;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 256 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 1200,
            max: 2500,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 0,
            delta: -64,
        },
        Instruction::Wait { ms: 600 },
        Instruction::Shoot {
            sound: SFX_LGCAL1,
            unused: 33,
        },
        Instruction::Wait { ms: 400 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
        Instruction::EnemyReset { item },
    ]);
    program.extend(hand_off(
        item,
        Instruction::PausedReset1of2 {
            items: [TARGET_2, TARGET_3],
        },
    ));
    program
}

fn janitor(counter: VariableId, rules: RulesVariant) -> Vec<Instruction> {
    let item = TARGET_2;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 768 },
        Instruction::Position { point: 0 },
        Instruction::Wait { ms: 400 },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 5 },
    ]);
    program.extend(walk_off(item, rules));
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

// Rises from behind the crates before it can fire.
fn crouching(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_3;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 600,
            max: 1200,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 2 },
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
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

// Swings round through north to face the player.
fn bay_enemy(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_4;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 900 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 2500,
            max: 4500,
        },
        Instruction::ObstacleSet { item },
        Instruction::PlaySound {
            sound: SFX_CROSLOCK,
            volume: 25,
        },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 100,
            delta: 64,
        },
        Instruction::Wait { ms: 900 },
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
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_5 }));
    program
}

fn bay_innocent(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_5;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 512 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 2000,
            max: 3500,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Wait { ms: 1400 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
    ]);
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_4 }));
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balcony_and_bay_start_on_stage() {
        let active: Vec<ItemId> = course(RulesVariant::Restored)
            .tracks
            .iter()
            .filter(|track| track.starts_active)
            .map(|track| track.item)
            .collect();
        assert_eq!(active, vec![TARGET_1, TARGET_4]);
    }

    #[test]
    fn bay_enemy_turns_across_north() {
        let course = course(RulesVariant::Restored);
        let track = course.track(TARGET_4).expect("bay track");
        assert!(track.program.instructions().contains(&Instruction::Rotate {
            target: 100,
            delta: 64,
        }));
    }
}
