use std::{fs, path::Path, rc::Rc};

use anyhow::{bail, Context, Result};
use maze_tracks::{builtin_course, load_course_dir, Course, RulesVariant};
use serde::Serialize;

use crate::audio_bridge::{AudioCallback, RecordingAudioCallback};
use crate::cli::{CourseSelection, DumpCourseArgs, RunArgs};
use crate::events::{MazeEvent, MazeEventRecord};
use crate::player::{Marksman, PauseWindow};
use crate::scene::{MazeSession, SceneSnapshot};
use crate::scheduler::ShotScheduler;
use crate::state::GameState;

#[derive(Serialize)]
struct MazeEventLog<'a> {
    events: &'a [MazeEventRecord],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub scene: String,
    pub counter: i32,
    pub target_count: i32,
    pub penalty: i32,
    pub enemies_hit: usize,
    pub innocents_hit: usize,
    pub player_shot: usize,
    pub innocents_escaped: usize,
    pub cleared: bool,
    pub score_after: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub rules: RulesVariant,
    pub update_interval_ms: u32,
    pub courses: Vec<CourseSummary>,
    pub final_score: i32,
    pub shots_fired: usize,
    pub state: GameState,
}

pub fn resolve_courses(selection: &CourseSelection) -> Result<Vec<Course>> {
    let mut courses = Vec::new();
    for name in &selection.names {
        let course = match builtin_course(name, selection.rules) {
            Some(course) => course,
            None => Course::from_json_file(Path::new(name))
                .with_context(|| format!("loading course {name}"))?,
        };
        courses.push(course);
    }
    if let Some(dir) = selection.course_dir.as_ref() {
        courses.extend(
            load_course_dir(dir)
                .with_context(|| format!("loading courses under {}", dir.display()))?,
        );
    }
    if courses.is_empty() {
        bail!("no courses selected");
    }
    Ok(courses)
}

pub fn dump_course(args: DumpCourseArgs) -> Result<()> {
    let courses = resolve_courses(&args.selection)?;
    let Some(course) = courses.first() else {
        bail!("no courses selected");
    };
    write_file(&args.output, &course.to_json_pretty()?)?;
    println!("Saved {} course to {}", course.scene, args.output.display());
    Ok(())
}

pub fn execute(args: RunArgs) -> Result<()> {
    let RunArgs {
        selection,
        config,
        frame_ms,
        duration_ms,
        shots,
        pauses,
        marksman,
        event_log_json,
        audio_log_json,
        summary_json,
        snapshot_json,
    } = args;

    let courses = resolve_courses(&selection)?;

    let audio_recorder = audio_log_json
        .as_ref()
        .map(|_| Rc::new(RecordingAudioCallback::new()));
    let audio_callback = audio_recorder
        .as_ref()
        .map(|recorder| recorder.clone() as Rc<dyn AudioCallback>);

    let mut session = MazeSession::new(&config, audio_callback);
    let mut scheduler = ShotScheduler::new(shots);
    let mut marksman = marksman.map(Marksman::new);
    let mut summaries = Vec::new();
    let mut snapshots: Vec<SceneSnapshot> = Vec::new();

    for course in courses {
        let first_event = session.events().len();
        session.enter(course);

        let mut elapsed: u64 = 0;
        while elapsed < duration_ms {
            sync_pause(&mut session, &pauses);
            let step = u64::from(frame_ms).min(duration_ms - elapsed);
            // `step` never exceeds `frame_ms`, so it fits.
            session.tick(step as u32);
            elapsed += step;

            for shot in scheduler.due(session.clock_ms()) {
                if !session.clicked_on_item(shot.item, true) {
                    log::debug!("scripted shot at {} missed {}", shot.at_ms, shot.item);
                }
            }
            if let Some(marksman) = marksman.as_mut() {
                for item in marksman.aim(&session) {
                    session.clicked_on_item(item, true);
                }
            }
        }

        if snapshot_json.is_some() {
            snapshots.push(session.snapshot());
        }
        let Some(leave) = session.leave() else {
            continue;
        };
        let summary = summarize(
            &session.events()[first_event..],
            leave.scene,
            leave.counter,
            leave.target_count,
            leave.penalty,
            leave.score,
        );
        println!(
            "{scene}: counter {counter}/{target} | enemies hit {hits} | innocents hit {innocents} | shot at {shot} | escaped {escaped} | penalty {penalty} | score {score}",
            scene = summary.scene,
            counter = summary.counter,
            target = summary.target_count,
            hits = summary.enemies_hit,
            innocents = summary.innocents_hit,
            shot = summary.player_shot,
            escaped = summary.innocents_escaped,
            penalty = summary.penalty,
            score = summary.score_after,
        );
        summaries.push(summary);
    }

    if !scheduler.is_empty() {
        log::warn!(
            "{} scripted shot(s) fall after the run ended",
            scheduler.len()
        );
    }

    let final_score = session.state().police_maze_score();
    println!("Final police maze score: {final_score}");

    if let Some(path) = event_log_json.as_ref() {
        let log = MazeEventLog {
            events: session.events(),
        };
        let json =
            serde_json::to_string_pretty(&log).context("serializing maze event log to JSON")?;
        write_file(path, &json)?;
        println!("Saved maze event log to {}", path.display());
    }

    if let (Some(path), Some(recorder)) = (audio_log_json.as_ref(), audio_recorder) {
        let json = serde_json::to_string_pretty(&recorder.events())
            .context("serializing audio event log to JSON")?;
        write_file(path, &json)?;
        println!("Saved audio event log to {}", path.display());
    }

    if let Some(path) = summary_json.as_ref() {
        let summary = RunSummary {
            seed: config.seed,
            rules: config.rules,
            update_interval_ms: config.update_interval_ms,
            courses: summaries,
            final_score,
            shots_fired: scheduler.history().len(),
            state: session.state().clone(),
        };
        let json =
            serde_json::to_string_pretty(&summary).context("serializing run summary to JSON")?;
        write_file(path, &json)?;
        println!("Saved run summary to {}", path.display());
    }

    if let Some(path) = snapshot_json.as_ref() {
        let json = serde_json::to_string_pretty(&snapshots)
            .context("serializing scene snapshots to JSON")?;
        write_file(path, &json)?;
        println!("Saved scene snapshots to {}", path.display());
    }

    Ok(())
}

/// Pauses the maze while any window covers the run clock.
fn sync_pause(session: &mut MazeSession, pauses: &[PauseWindow]) {
    let paused = pauses
        .iter()
        .any(|window| window.covers(session.clock_ms()));
    if paused != session.is_paused() {
        session.set_paused(paused);
    }
}

fn summarize(
    events: &[MazeEventRecord],
    scene: String,
    counter: i32,
    target_count: i32,
    penalty: i32,
    score_after: i32,
) -> CourseSummary {
    let mut summary = CourseSummary {
        scene,
        counter,
        target_count,
        penalty,
        enemies_hit: 0,
        innocents_hit: 0,
        player_shot: 0,
        innocents_escaped: 0,
        cleared: false,
        score_after,
    };
    for record in events {
        match record.event {
            MazeEvent::TargetHit { enemy: true, .. } => summary.enemies_hit += 1,
            MazeEvent::TargetHit { enemy: false, .. } => summary.innocents_hit += 1,
            MazeEvent::PlayerShot { .. } => summary.player_shot += 1,
            MazeEvent::InnocentEscaped { .. } => summary.innocents_escaped += 1,
            MazeEvent::CourseCleared => summary.cleared = true,
            _ => {}
        }
    }
    summary
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
