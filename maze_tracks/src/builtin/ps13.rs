use crate::course::{Course, ItemSpawn, TrackSpec};
use crate::ids::{ItemId, VariableId, Vec3, PS13_TARGET_COUNTER};
use crate::instruction::Instruction;

use super::{hand_off, life_cycle, walk_off, RulesVariant, SFX_CROSLOCK, SFX_SMCAL3};

const TARGET_1: ItemId = ItemId(46);
const TARGET_2: ItemId = ItemId(47);
const TARGET_3: ItemId = ItemId(48);
const TARGET_4: ItemId = ItemId(49);
const TARGET_5: ItemId = ItemId(50);

const TARGET_COUNT: i32 = 14;

// Last stretch before the exit. The stairwell gunman wakes one of three:
// a two-faced cutout (targets 2 and 3) or a fleeing civilian. The rooftop
// gunman loops on his own.
pub(super) fn course(rules: RulesVariant) -> Course {
    let counter = PS13_TARGET_COUNTER;
    let floor = 1.2;

    Course {
        scene: "PS13".to_string(),
        counter,
        target_count: TARGET_COUNT,
        items: vec![
            ItemSpawn::hidden(TARGET_1, 512),
            ItemSpawn::hidden(TARGET_2, 0),
            ItemSpawn::hidden(TARGET_3, 0),
            ItemSpawn::hidden(TARGET_4, 256),
            ItemSpawn::hidden(TARGET_5, 768),
        ],
        tracks: vec![
            TrackSpec {
                item: TARGET_1,
                start: Vec3::new(-840.0, floor, -400.0),
                end: Vec3::new(-840.0, floor, -300.0),
                steps: 4,
                program: stairwell(counter).into(),
                starts_active: true,
            },
            TrackSpec {
                item: TARGET_2,
                start: Vec3::new(-700.0, floor, -520.0),
                end: Vec3::new(-700.0, floor, -520.0),
                steps: 1,
                program: cutout_enemy(counter).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_3,
                start: Vec3::new(-700.0, floor, -520.0),
                end: Vec3::new(-700.0, floor, -520.0),
                steps: 1,
                program: cutout_innocent(counter).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_4,
                start: Vec3::new(-980.0, floor, -200.0),
                end: Vec3::new(-600.0, floor, -200.0),
                steps: 9,
                program: fleeing(counter, rules).into(),
                starts_active: false,
            },
            TrackSpec {
                item: TARGET_5,
                start: Vec3::new(-620.0, 160.0, -640.0),
                end: Vec3::new(-620.0, 160.0, -640.0),
                steps: 1,
                program: rooftop(counter).into(),
                starts_active: true,
            },
        ],
        hit_groups: vec![vec![TARGET_2, TARGET_3]],
    }
}

fn stairwell(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_1;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 512 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 800,
            max: 1800,
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
        Instruction::Move { point: 3 },
        Instruction::Wait { ms: 500 },
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

fn cutout_enemy(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_2;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 400,
            max: 1000,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 256,
            delta: 80,
        },
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

fn cutout_innocent(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_3;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 400,
            max: 1000,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 256,
            delta: 80,
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

fn fleeing(counter: VariableId, rules: RulesVariant) -> Vec<Instruction> {
    let item = TARGET_4;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 256 },
        Instruction::Position { point: 0 },
        Instruction::Wait { ms: 300 },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 8 },
    ]);
    program.extend(walk_off(item, rules));
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

// Never hands off; stops once the counter is full.
fn rooftop(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_5;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 768 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 3000,
            max: 6000,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Wait { ms: 1000 },
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
        Instruction::Restart,
    ]);
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutout_faces_share_a_hit_group() {
        let course = course(RulesVariant::Restored);
        assert_eq!(course.hit_group(TARGET_3), vec![TARGET_2, TARGET_3]);
        let enemy = course.track(TARGET_2).expect("enemy face");
        let innocent = course.track(TARGET_3).expect("innocent face");
        assert_eq!(enemy.points(), innocent.points());
    }

    #[test]
    fn rooftop_never_pauses_itself() {
        let course = course(RulesVariant::Original);
        let rooftop = course.track(TARGET_5).expect("rooftop track");
        assert!(rooftop.starts_active);
        assert!(!rooftop
            .program
            .instructions()
            .iter()
            .any(|instruction| matches!(instruction, Instruction::PausedSet { .. })));
    }
}
