use maze_tracks::{normalize_facing, Instruction, ItemId, Program, TrackSpec, Vec3};
use serde::Serialize;

use crate::events::MazeEvent;
use crate::world::MazeWorld;

/// Volume of a target's gunshot.
const SHOOT_VOLUME: i32 = 90;

/// Changes one track asks of other tracks; applied by the maze after the
/// issuing track finishes its update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrackEffect {
    Pause(ItemId),
    Resume(ItemId),
    ResumeOneOf(Vec<ItemId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rotation {
    /// Normalized; the remaining arc is measured from the current facing.
    target: i32,
    delta: i32,
}

/// Resume point of one target's program.
#[derive(Debug, Clone)]
pub(crate) struct TargetTrack {
    item: ItemId,
    points: Vec<Vec3>,
    program: Program,
    cursor: usize,
    paused: bool,
    halted: bool,
    point_index: usize,
    wait_left_ms: Option<i64>,
    rotation: Option<Rotation>,
    move_target: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSnapshot {
    pub item: ItemId,
    pub cursor: usize,
    pub paused: bool,
    pub halted: bool,
    pub point_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_left_ms: Option<i64>,
    pub rotating: bool,
    pub moving: bool,
}

impl TargetTrack {
    pub(crate) fn new(spec: &TrackSpec) -> Self {
        TargetTrack {
            item: spec.item,
            points: spec.points(),
            program: spec.program.clone(),
            cursor: 0,
            paused: !spec.starts_active,
            halted: false,
            point_index: 0,
            wait_left_ms: None,
            rotation: None,
            move_target: None,
        }
    }

    pub(crate) fn item(&self) -> ItemId {
        self.item
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns whether the paused state changed.
    pub(crate) fn set_paused(&mut self, paused: bool) -> bool {
        std::mem::replace(&mut self.paused, paused) != paused
    }

    pub(crate) fn first_point(&self) -> Vec3 {
        self.points.first().copied().unwrap_or_default()
    }

    pub(crate) fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            item: self.item,
            cursor: self.cursor,
            paused: self.paused,
            halted: self.halted,
            point_index: self.point_index,
            wait_left_ms: self.wait_left_ms,
            rotating: self.rotation.is_some(),
            moving: self.move_target.is_some(),
        }
    }

    /// Runs one cadence step. Cross-track requests are pushed to `effects`.
    pub(crate) fn update(
        &mut self,
        world: &mut MazeWorld,
        elapsed_ms: u32,
        effects: &mut Vec<TrackEffect>,
    ) {
        if self.paused || self.halted {
            return;
        }

        if let Some(left) = self.wait_left_ms {
            let left = left - i64::from(elapsed_ms);
            if left > 0 {
                self.wait_left_ms = Some(left);
                return;
            }
            self.wait_left_ms = None;
        }

        if world.items.is_spinning(self.item) {
            return;
        }

        if self.rotation.is_some() && self.step_rotation(world) {
            return;
        }

        if let Some(target) = self.move_target {
            if self.point_index != target {
                if self.point_index < target {
                    self.point_index += 1;
                } else {
                    self.point_index -= 1;
                }
                self.place(world);
                return;
            }
            self.move_target = None;
        }

        self.execute(world, effects);
    }

    /// Applies one rotation step; returns `true` while still rotating.
    fn step_rotation(&mut self, world: &mut MazeWorld) -> bool {
        let Some(rotation) = self.rotation else {
            return false;
        };
        let facing = world.items.facing(self.item).unwrap_or(rotation.target);
        // Distance still to turn in the direction of `delta`.
        let remaining = normalize_facing((rotation.target - facing) * rotation.delta.signum());
        if rotation.delta == 0 || remaining.unsigned_abs() <= rotation.delta.unsigned_abs() {
            world.items.set_facing(self.item, rotation.target);
            self.rotation = None;
            false
        } else {
            world.items.set_facing(self.item, facing + rotation.delta);
            true
        }
    }

    fn place(&self, world: &mut MazeWorld) {
        if let Some(point) = self.points.get(self.point_index) {
            world.items.set_position(self.item, *point);
        }
    }

    fn clamp_point(&self, point: u32) -> usize {
        let last = self.points.len().saturating_sub(1);
        (point as usize).min(last)
    }

    fn execute(&mut self, world: &mut MazeWorld, effects: &mut Vec<TrackEffect>) {
        let item = self.item;
        loop {
            let Some(instruction) = self.program.get(self.cursor).copied() else {
                self.halted = true;
                log::warn!("{item} ran off the end of its program at {}", self.cursor);
                world.record(MazeEvent::TrackHalted { item });
                return;
            };

            match instruction {
                Instruction::Activate { variable, max } => {
                    if world.state.query(variable) >= max {
                        // Stays on this instruction so a later resume checks again.
                        self.paused = true;
                        world.record(MazeEvent::TrackPaused { item });
                        return;
                    }
                }
                Instruction::Leave => {
                    if !world.items.is_enemy(item) && world.items.is_target(item) {
                        world.adjust_score(1);
                        world.record(MazeEvent::InnocentEscaped { item });
                    }
                }
                Instruction::Shoot { sound, .. } => {
                    if world.items.is_target(item) {
                        world.play_sound(sound, SHOOT_VOLUME);
                        world.adjust_score(-1);
                        world.record(MazeEvent::PlayerShot { item });
                    }
                }
                Instruction::EnemyReset { item: other } => world.set_enemy(other, false),
                Instruction::EnemySet { item: other } => world.set_enemy(other, true),
                Instruction::FlagReset { flag } => world.state.reset_flag(flag),
                Instruction::FlagSet { flag } => world.state.set_flag(flag),
                Instruction::VariableDec { variable } => {
                    world.state.decrement(variable, 1);
                }
                Instruction::VariableInc { variable, max } => {
                    if world.state.query(variable) < max {
                        world.state.increment(variable, 1);
                    }
                }
                Instruction::VariableReset { variable } => world.state.reset(variable),
                Instruction::VariableSet { variable, value } => world.state.set(variable, value),
                Instruction::TargetSet {
                    item: other,
                    targetable,
                } => world.set_targetable(other, targetable),
                Instruction::PausedReset1of3 { items } => {
                    effects.push(TrackEffect::ResumeOneOf(items.to_vec()));
                }
                Instruction::PausedReset1of2 { items } => {
                    effects.push(TrackEffect::ResumeOneOf(items.to_vec()));
                }
                Instruction::PausedSet { item: other } => {
                    if other == item {
                        self.cursor += 1;
                        self.paused = true;
                        world.record(MazeEvent::TrackPaused { item });
                        return;
                    }
                    effects.push(TrackEffect::Pause(other));
                }
                Instruction::PausedReset { item: other } => {
                    if other != item {
                        effects.push(TrackEffect::Resume(other));
                    }
                }
                Instruction::PlaySound { sound, volume } => world.play_sound(sound, volume),
                Instruction::ObstacleReset { item: other } => world.set_visible(other, false),
                Instruction::ObstacleSet { item: other } => world.set_visible(other, true),
                Instruction::WaitRandom { min, max } => {
                    self.cursor += 1;
                    self.wait_left_ms = Some(i64::from(world.random_between(min, max)));
                    return;
                }
                Instruction::Rotate { target, delta } => {
                    self.cursor += 1;
                    self.start_rotation(target, delta);
                    return;
                }
                Instruction::Facing { angle } => {
                    world.items.set_facing(item, angle);
                }
                Instruction::Restart => {
                    self.cursor = 0;
                    return;
                }
                Instruction::Wait { ms } => {
                    self.cursor += 1;
                    self.wait_left_ms = Some(i64::from(ms));
                    return;
                }
                Instruction::Move { point } => {
                    self.cursor += 1;
                    self.move_target = Some(self.clamp_point(point));
                    return;
                }
                Instruction::Position { point } => {
                    self.point_index = self.clamp_point(point);
                    self.place(world);
                }
            }
            self.cursor += 1;
        }
    }

    fn start_rotation(&mut self, target: i32, delta: i32) {
        self.rotation = Some(Rotation {
            target: normalize_facing(target),
            delta,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_tracks::{ItemSpawn, SoundId, VariableId};

    const ITEM: ItemId = ItemId(0);

    fn spec(program: Vec<Instruction>, steps: u32) -> TrackSpec {
        TrackSpec {
            item: ITEM,
            start: Vec3::new(0.0, 0.0, 0.0),
            end: Vec3::new(30.0, 0.0, 0.0),
            steps,
            program: program.into(),
            starts_active: true,
        }
    }

    fn world_with_item(facing: i32) -> MazeWorld {
        let mut world = MazeWorld::new(3);
        world
            .items
            .add_to_world(&ItemSpawn::hidden(ITEM, facing), Vec3::default());
        world
    }

    fn run(track: &mut TargetTrack, world: &mut MazeWorld, elapsed_ms: u32) -> Vec<TrackEffect> {
        let mut effects = Vec::new();
        track.update(world, elapsed_ms, &mut effects);
        effects
    }

    #[test]
    fn wait_holds_until_time_is_spent() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Wait { ms: 100 },
                Instruction::ObstacleSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        run(&mut track, &mut world, 66);
        assert!(!world.items.is_visible(ITEM));
        run(&mut track, &mut world, 66);
        assert!(world.items.is_visible(ITEM));
        assert_eq!(track.snapshot().cursor, 0);
    }

    #[test]
    fn move_walks_one_point_per_update() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Move { point: 3 },
                Instruction::ObstacleSet { item: ITEM },
                Instruction::Restart,
            ],
            4,
        ));
        run(&mut track, &mut world, 0);
        for expected in 1..=3 {
            run(&mut track, &mut world, 66);
            assert_eq!(track.snapshot().point_index, expected);
            assert!(!world.items.is_visible(ITEM));
        }
        let position = world.items.get(ITEM).expect("item").position;
        assert_eq!(position, Vec3::new(30.0, 0.0, 0.0));
        run(&mut track, &mut world, 66);
        assert!(world.items.is_visible(ITEM));
    }

    #[test]
    fn out_of_range_points_clamp_to_the_last_one() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![Instruction::Position { point: 99 }, Instruction::Restart],
            4,
        ));
        run(&mut track, &mut world, 0);
        assert_eq!(track.snapshot().point_index, 3);
    }

    #[test]
    fn rotation_steps_backwards_across_zero() {
        let mut world = world_with_item(100);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Rotate {
                    target: 900,
                    delta: -80,
                },
                Instruction::ObstacleSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        let mut facings = Vec::new();
        while !world.items.is_visible(ITEM) {
            run(&mut track, &mut world, 66);
            facings.push(world.items.facing(ITEM).expect("item"));
            assert!(facings.len() < 10, "rotation never finished");
        }
        assert_eq!(facings, vec![20, 964, 900]);
        assert!(facings.iter().all(|facing| (0..1024).contains(facing)));
    }

    #[test]
    fn rotation_resumes_from_the_facing_left_by_a_spin() {
        let mut world = world_with_item(420);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Rotate {
                    target: 100,
                    delta: 80,
                },
                Instruction::ObstacleSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        run(&mut track, &mut world, 66);
        assert_eq!(world.items.facing(ITEM), Some(500));

        // A full spin turns the item by 544 units, leaving it at 20.
        world.items.spin_in_world(ITEM);
        while !world.items.advance_spins().contains(&ITEM) {}
        assert_eq!(world.items.facing(ITEM), Some(20));

        run(&mut track, &mut world, 66);
        assert_eq!(world.items.facing(ITEM), Some(100));
        assert!(track.rotation.is_none());
        assert!(world.items.is_visible(ITEM));
    }

    #[test]
    fn zero_delta_snaps_to_target() {
        let mut world = world_with_item(10);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Rotate {
                    target: 512,
                    delta: 0,
                },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        run(&mut track, &mut world, 66);
        assert_eq!(world.items.facing(ITEM), Some(512));
    }

    #[test]
    fn activate_at_limit_pauses_in_place() {
        let counter = VariableId(10);
        let mut world = world_with_item(0);
        world.state.set(counter, 2);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Activate {
                    variable: counter,
                    max: 2,
                },
                Instruction::VariableInc {
                    variable: counter,
                    max: 2,
                },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        assert!(track.is_paused());
        assert_eq!(track.snapshot().cursor, 0);
        assert_eq!(world.state.query(counter), 2);
    }

    #[test]
    fn self_pause_parks_before_restart() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::PausedReset { item: ItemId(5) },
                Instruction::PausedSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        let effects = run(&mut track, &mut world, 0);
        assert_eq!(effects, vec![TrackEffect::Resume(ItemId(5))]);
        assert!(track.is_paused());
        assert_eq!(track.snapshot().cursor, 2);

        assert!(track.set_paused(false));
        run(&mut track, &mut world, 66);
        assert_eq!(track.snapshot().cursor, 0);
    }

    #[test]
    fn running_off_the_end_halts_once() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(vec![Instruction::ObstacleSet { item: ITEM }], 1));
        run(&mut track, &mut world, 0);
        run(&mut track, &mut world, 66);
        assert!(track.is_halted());
        let halts = world
            .events()
            .iter()
            .filter(|record| matches!(record.event, MazeEvent::TrackHalted { .. }))
            .count();
        assert_eq!(halts, 1);
    }

    #[test]
    fn shoot_only_fires_while_targetable() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Shoot {
                    sound: SoundId(27),
                    unused: 33,
                },
                Instruction::TargetSet {
                    item: ITEM,
                    targetable: true,
                },
                Instruction::Shoot {
                    sound: SoundId(27),
                    unused: 33,
                },
                Instruction::PausedSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        assert_eq!(world.state.police_maze_score(), -1);
    }

    #[test]
    fn spinning_items_hold_the_track() {
        let mut world = world_with_item(0);
        let mut track = TargetTrack::new(&spec(
            vec![
                Instruction::Wait { ms: 10 },
                Instruction::ObstacleSet { item: ITEM },
                Instruction::Restart,
            ],
            1,
        ));
        run(&mut track, &mut world, 0);
        world.items.spin_in_world(ITEM);
        run(&mut track, &mut world, 66);
        assert!(!world.items.is_visible(ITEM));
        while !world.items.advance_spins().contains(&ITEM) {}
        run(&mut track, &mut world, 66);
        assert!(world.items.is_visible(ITEM));
    }
}
