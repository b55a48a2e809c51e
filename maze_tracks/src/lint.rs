//! Authoring checks for course tables.
//!
//! Tables are static data; nothing here runs during play. Findings point at
//! sequences that make a track misbehave: halting, staying shootable after
//! it hid, or walking off the end of its point list.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::course::{Course, TrackSpec};
use crate::ids::ItemId;
use crate::instruction::{Instruction, Opcode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    /// No `Restart`: the track runs off the end of its program and halts.
    MissingRestart,
    /// `TargetSet item 1` without a matching `TargetSet item 0` before the
    /// loop ends or the track pauses itself.
    TargetWindowLeft { target: ItemId },
    EnemySetWhileHidden { target: ItemId },
    PointOutOfRange { point: u32, steps: u32 },
    EmptyWaitRange { min: u32, max: u32 },
    UnknownTrack { target: ItemId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub scene: String,
    pub track: ItemId,
    /// Instruction index the finding points at.
    pub index: usize,
    pub opcode: Option<Opcode>,
    #[serde(flatten)]
    pub kind: FindingKind,
}

pub fn lint_course(course: &Course) -> Vec<Finding> {
    let known: BTreeSet<ItemId> = course.tracks.iter().map(|track| track.item).collect();
    let mut findings = Vec::new();
    for track in &course.tracks {
        lint_track(course, track, &known, &mut findings);
    }
    findings
}

fn lint_track(
    course: &Course,
    track: &TrackSpec,
    known: &BTreeSet<ItemId>,
    findings: &mut Vec<Finding>,
) {
    let mut push = |index: usize, opcode: Option<Opcode>, kind: FindingKind| {
        findings.push(Finding {
            scene: course.scene.clone(),
            track: track.item,
            index,
            opcode,
            kind,
        });
    };

    let program = track.program.instructions();
    if !program.contains(&Instruction::Restart) {
        push(program.len(), None, FindingKind::MissingRestart);
    }

    // Open targetability windows, keyed by item, with the index that opened them.
    let mut open_windows: Vec<(ItemId, usize)> = Vec::new();
    let mut shown: BTreeSet<ItemId> = BTreeSet::new();

    for (index, instruction) in program.iter().enumerate() {
        let opcode = Some(instruction.opcode());
        match *instruction {
            Instruction::TargetSet { item, targetable } => {
                open_windows.retain(|(open, _)| *open != item);
                if targetable {
                    open_windows.push((item, index));
                }
            }
            Instruction::ObstacleSet { item } => {
                shown.insert(item);
            }
            Instruction::ObstacleReset { item } => {
                shown.remove(&item);
            }
            Instruction::EnemySet { item } => {
                if !shown.contains(&item) {
                    push(index, opcode, FindingKind::EnemySetWhileHidden { target: item });
                }
            }
            Instruction::Move { point } | Instruction::Position { point } => {
                if point >= track.steps.max(1) {
                    push(
                        index,
                        opcode,
                        FindingKind::PointOutOfRange {
                            point,
                            steps: track.steps,
                        },
                    );
                }
            }
            Instruction::WaitRandom { min, max } if min > max => {
                push(index, opcode, FindingKind::EmptyWaitRange { min, max });
            }
            _ => {}
        }

        for target in instruction.paused_targets() {
            if !known.contains(target) {
                push(index, opcode, FindingKind::UnknownTrack { target: *target });
            }
        }

        let closes_loop = matches!(instruction, Instruction::Restart)
            || matches!(instruction, Instruction::PausedSet { item } if *item == track.item);
        if closes_loop {
            for (item, opened_at) in open_windows.drain(..) {
                push(
                    opened_at,
                    Some(Opcode::TargetSet),
                    FindingKind::TargetWindowLeft { target: item },
                );
            }
            shown.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Program, TrackSpec};
    use crate::ids::{Vec3, PS10_TARGET_COUNTER};

    fn course_with(program: Vec<Instruction>, steps: u32) -> Course {
        Course {
            scene: "TEST".to_string(),
            counter: PS10_TARGET_COUNTER,
            target_count: 1,
            items: Vec::new(),
            tracks: vec![TrackSpec {
                item: ItemId(0),
                start: Vec3::default(),
                end: Vec3::default(),
                steps,
                program: Program::from(program),
                starts_active: true,
            }],
            hit_groups: Vec::new(),
        }
    }

    #[test]
    fn clean_pop_up_has_no_findings() {
        let item = ItemId(0);
        let course = course_with(
            vec![
                Instruction::ObstacleSet { item },
                Instruction::EnemySet { item },
                Instruction::TargetSet {
                    item,
                    targetable: true,
                },
                Instruction::Wait { ms: 1000 },
                Instruction::ObstacleReset { item },
                Instruction::TargetSet {
                    item,
                    targetable: false,
                },
                Instruction::PausedSet { item },
                Instruction::Restart,
            ],
            1,
        );
        assert!(lint_course(&course).is_empty());
    }

    #[test]
    fn flags_missing_restart() {
        let course = course_with(vec![Instruction::Wait { ms: 10 }], 1);
        let findings = lint_course(&course);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MissingRestart);
        assert_eq!(findings[0].index, 1);
    }

    #[test]
    fn flags_target_window_left_open() {
        let item = ItemId(0);
        let course = course_with(
            vec![
                Instruction::ObstacleSet { item },
                Instruction::TargetSet {
                    item,
                    targetable: true,
                },
                Instruction::Wait { ms: 1000 },
                Instruction::ObstacleReset { item },
                Instruction::PausedSet { item },
                Instruction::Restart,
            ],
            1,
        );
        let findings = lint_course(&course);
        assert_eq!(
            findings,
            vec![Finding {
                scene: "TEST".to_string(),
                track: item,
                index: 1,
                opcode: Some(Opcode::TargetSet),
                kind: FindingKind::TargetWindowLeft { target: item },
            }]
        );
    }

    #[test]
    fn flags_enemy_set_on_hidden_target_and_bad_points() {
        let item = ItemId(0);
        let course = course_with(
            vec![
                Instruction::EnemySet { item },
                Instruction::Move { point: 4 },
                Instruction::WaitRandom { min: 9, max: 3 },
                Instruction::PausedReset { item: ItemId(42) },
                Instruction::Restart,
            ],
            4,
        );
        let kinds: Vec<FindingKind> = lint_course(&course)
            .into_iter()
            .map(|finding| finding.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::EnemySetWhileHidden { target: item },
                FindingKind::PointOutOfRange { point: 4, steps: 4 },
                FindingKind::EmptyWaitRange { min: 9, max: 3 },
                FindingKind::UnknownTrack { target: ItemId(42) },
            ]
        );
    }

    #[test]
    fn findings_serialize_with_kind_tag() {
        let course = course_with(vec![Instruction::Wait { ms: 10 }], 1);
        let value = serde_json::to_value(&lint_course(&course)[0]).expect("serialize");
        assert_eq!(value["kind"], "missing_restart");
        assert_eq!(value["track"], 0);
    }
}
