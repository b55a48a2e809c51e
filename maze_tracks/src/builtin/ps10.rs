use crate::course::{Course, ItemSpawn, TrackSpec};
use crate::ids::{ItemId, VariableId, Vec3, PS10_TARGET_COUNTER};
use crate::instruction::Instruction;

use super::{
    hand_off, life_cycle, walk_off, RulesVariant, SFX_CROSLOCK, SFX_LGCAL1, SFX_SMCAL3,
};

const TARGET_1: ItemId = ItemId(0);
const TARGET_2: ItemId = ItemId(1);
const TARGET_3: ItemId = ItemId(2);
const TARGET_4: ItemId = ItemId(3);
const TARGET_5: ItemId = ItemId(4);
const TARGET_6: ItemId = ItemId(5);

const TARGET_COUNT: i32 = 10;

// Targets 1 -> (2 | 3) -> 4 -> 1 share the stage in the hallway; 5 and 6
// alternate in the window.
pub(super) fn course(rules: RulesVariant) -> Course {
    let counter = PS10_TARGET_COUNTER;
    let floor = -9.91;

    let tracks = vec![
        TrackSpec {
            item: TARGET_1,
            start: Vec3::new(-240.0, floor, -55.0),
            end: Vec3::new(-140.0, floor, -55.0),
            steps: 7,
            program: target_1(counter).into(),
            starts_active: true,
        },
        TrackSpec {
            item: TARGET_2,
            start: Vec3::new(-80.0, floor, -120.0),
            end: Vec3::new(-80.0, floor, -120.0),
            steps: 1,
            program: target_2(counter).into(),
            starts_active: false,
        },
        TrackSpec {
            item: TARGET_3,
            start: Vec3::new(-80.0, floor, -120.0),
            end: Vec3::new(-80.0, floor, -120.0),
            steps: 1,
            program: target_3(counter, rules).into(),
            starts_active: false,
        },
        TrackSpec {
            item: TARGET_4,
            start: Vec3::new(-300.0, floor, 30.0),
            end: Vec3::new(-20.0, floor, 30.0),
            steps: 10,
            program: target_4(counter, rules).into(),
            starts_active: false,
        },
        TrackSpec {
            item: TARGET_5,
            start: Vec3::new(40.0, 20.0, -200.0),
            end: Vec3::new(40.0, 20.0, -200.0),
            steps: 1,
            program: window_enemy(counter).into(),
            starts_active: true,
        },
        TrackSpec {
            item: TARGET_6,
            start: Vec3::new(40.0, 20.0, -200.0),
            end: Vec3::new(40.0, 20.0, -200.0),
            steps: 1,
            program: window_innocent(counter).into(),
            starts_active: false,
        },
    ];

    Course {
        scene: "PS10".to_string(),
        counter,
        target_count: TARGET_COUNT,
        items: vec![
            ItemSpawn::hidden(TARGET_1, 989),
            ItemSpawn::hidden(TARGET_2, 0),
            ItemSpawn::hidden(TARGET_3, 0),
            ItemSpawn::hidden(TARGET_4, 256),
            ItemSpawn::hidden(TARGET_5, 512),
            ItemSpawn::hidden(TARGET_6, 512),
        ],
        tracks,
        hit_groups: vec![vec![TARGET_2, TARGET_3]],
    }
}

fn target_1(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_1;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 989 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 1500,
            max: 3000,
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
        Instruction::Move { point: 6 },
        Instruction::Wait { ms: 500 },
        Instruction::Rotate {
            target: 740,
            delta: -80,
        },
        Instruction::Wait { ms: 1000 },
        Instruction::Shoot {
            sound: SFX_SMCAL3,
            unused: 33,
        },
        Instruction::Wait { ms: 500 },
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

fn target_2(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_2;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 500,
            max: 1500,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemySet { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 256,
            delta: 64,
        },
        Instruction::Wait { ms: 800 },
        Instruction::Shoot {
            sound: SFX_SMCAL3,
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
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_4 }));
    program
}

// Same cutout as target 2, showing the civilian side.
fn target_3(counter: VariableId, rules: RulesVariant) -> Vec<Instruction> {
    let item = TARGET_3;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 0 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 500,
            max: 1500,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Rotate {
            target: 256,
            delta: 64,
        },
        Instruction::Wait { ms: 1500 },
        Instruction::ObstacleReset { item },
    ]);
    // The shipped table hides the civilian but never clears its target flag.
    if rules == RulesVariant::Restored {
        program.push(Instruction::TargetSet {
            item,
            targetable: false,
        });
    }
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_4 }));
    program
}

fn target_4(counter: VariableId, rules: RulesVariant) -> Vec<Instruction> {
    let item = TARGET_4;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 256 },
        Instruction::Position { point: 0 },
        Instruction::Wait { ms: 500 },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Move { point: 9 },
    ]);
    program.extend(walk_off(item, rules));
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_1 }));
    program
}

fn window_enemy(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_5;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 512 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 2000,
            max: 4000,
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
        Instruction::Wait { ms: 1200 },
        Instruction::Shoot {
            sound: SFX_LGCAL1,
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
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_6 }));
    program
}

fn window_innocent(counter: VariableId) -> Vec<Instruction> {
    let item = TARGET_6;
    let mut program = life_cycle(counter, TARGET_COUNT).to_vec();
    program.extend([
        Instruction::ObstacleReset { item },
        Instruction::Facing { angle: 512 },
        Instruction::Position { point: 0 },
        Instruction::WaitRandom {
            min: 2000,
            max: 4000,
        },
        Instruction::ObstacleSet { item },
        Instruction::EnemyReset { item },
        Instruction::TargetSet {
            item,
            targetable: true,
        },
        Instruction::Wait { ms: 1500 },
        Instruction::ObstacleReset { item },
        Instruction::TargetSet {
            item,
            targetable: false,
        },
    ]);
    program.extend(hand_off(item, Instruction::PausedReset { item: TARGET_5 }));
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_variants_share_layout() {
        let original = course(RulesVariant::Original);
        let restored = course(RulesVariant::Restored);
        assert_eq!(original.items, restored.items);
        assert_eq!(original.tracks.len(), restored.tracks.len());
        assert_eq!(original.hit_groups, restored.hit_groups);
    }

    #[test]
    fn only_the_civilian_cutout_differs_in_length() {
        let original = course(RulesVariant::Original);
        let restored = course(RulesVariant::Restored);
        for (a, b) in original.tracks.iter().zip(restored.tracks.iter()) {
            if a.item == TARGET_3 {
                assert_eq!(a.program.len() + 1, b.program.len());
            } else {
                assert_eq!(a.program.len(), b.program.len(), "{}", a.item);
            }
        }
    }

    #[test]
    fn two_tracks_start_on_stage() {
        let active: Vec<ItemId> = course(RulesVariant::Restored)
            .tracks
            .iter()
            .filter(|track| track.starts_active)
            .map(|track| track.item)
            .collect();
        assert_eq!(active, vec![TARGET_1, TARGET_5]);
    }
}
