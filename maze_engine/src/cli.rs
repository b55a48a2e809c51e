use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use maze_tracks::RulesVariant;

use crate::config::{MazeConfig, DEFAULT_SEED, DEFAULT_UPDATE_INTERVAL_MS};
use crate::player::{PauseWindow, ScheduledShot};

#[derive(Parser, Debug)]
#[command(
    about = "Headless host that runs police maze courses and logs what the targets do",
    version
)]
pub struct Args {
    /// Built-in course name (ps10 to ps13) or course JSON path; repeatable
    #[arg(long = "course", value_name = "COURSE")]
    pub courses: Vec<String>,

    /// Directory whose *.json course files run after any --course entries
    #[arg(long)]
    pub course_dir: Option<PathBuf>,

    /// Table variant used for built-in courses
    #[arg(long, value_enum, default_value_t = RulesVariant::Restored)]
    pub rules: RulesVariant,

    /// Seed for random waits and 1-of-N wake-ups
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Host frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u32,

    /// Time spent in each course before leaving it
    #[arg(long, default_value_t = 90_000)]
    pub duration_ms: u64,

    /// Track update cadence in milliseconds
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL_MS)]
    pub update_interval_ms: u32,

    /// Scripted player click, ITEM@MS on the run clock; repeatable
    #[arg(long = "shot", value_name = "ITEM@MS")]
    pub shots: Vec<String>,

    /// Pause the maze for DURATION ms from MS on the run clock; repeatable
    #[arg(long = "pause-at", value_name = "MS:DURATION")]
    pub pauses: Vec<String>,

    /// Shoot revealed enemies after this reaction time
    #[arg(long, value_name = "REACTION_MS")]
    pub marksman: Option<u64>,

    /// Path to write the maze event log as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the audio event log as JSON
    #[arg(long)]
    pub audio_log_json: Option<PathBuf>,

    /// Path to write the per-course run summary as JSON
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Path to write a snapshot of each scene, taken just before leaving it
    #[arg(long)]
    pub snapshot_json: Option<PathBuf>,

    /// Write the first selected course as JSON and exit
    #[arg(long)]
    pub dump_course_json: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Command {
    Run(RunArgs),
    DumpCourse(DumpCourseArgs),
}

#[derive(Debug, Clone)]
pub struct CourseSelection {
    pub names: Vec<String>,
    pub course_dir: Option<PathBuf>,
    pub rules: RulesVariant,
}

#[derive(Debug)]
pub struct RunArgs {
    pub selection: CourseSelection,
    pub config: MazeConfig,
    pub frame_ms: u32,
    pub duration_ms: u64,
    pub shots: Vec<ScheduledShot>,
    pub pauses: Vec<PauseWindow>,
    pub marksman: Option<u64>,
    pub event_log_json: Option<PathBuf>,
    pub audio_log_json: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub snapshot_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct DumpCourseArgs {
    pub selection: CourseSelection,
    pub output: PathBuf,
}

pub fn parse() -> Result<Command> {
    let args = Args::parse();
    args.into_command()
}

impl Args {
    pub fn into_command(self) -> Result<Command> {
        if self.frame_ms == 0 {
            bail!("--frame-ms must be at least 1");
        }
        if self.update_interval_ms == 0 {
            bail!("--update-interval-ms must be at least 1");
        }

        let mut names = self.courses;
        if names.is_empty() && self.course_dir.is_none() {
            names.push("ps10".to_string());
        }
        let selection = CourseSelection {
            names,
            course_dir: self.course_dir,
            rules: self.rules,
        };

        if let Some(output) = self.dump_course_json {
            return Ok(Command::DumpCourse(DumpCourseArgs { selection, output }));
        }

        let shots = self
            .shots
            .iter()
            .map(|value| ScheduledShot::parse(value))
            .collect::<Result<Vec<_>>>()?;
        let pauses = self
            .pauses
            .iter()
            .map(|value| PauseWindow::parse(value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Command::Run(RunArgs {
            selection,
            config: MazeConfig {
                seed: self.seed,
                update_interval_ms: self.update_interval_ms,
                rules: self.rules,
            },
            frame_ms: self.frame_ms,
            duration_ms: self.duration_ms,
            shots,
            pauses,
            marksman: self.marksman,
            event_log_json: self.event_log_json,
            audio_log_json: self.audio_log_json,
            summary_json: self.summary_json,
            snapshot_json: self.snapshot_json,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_tracks::ItemId;

    fn command(args: &[&str]) -> Result<Command> {
        let argv = std::iter::once("maze_engine").chain(args.iter().copied());
        Args::try_parse_from(argv)?.into_command()
    }

    #[test]
    fn defaults_to_ps10() -> Result<()> {
        match command(&[])? {
            Command::Run(run) => {
                assert_eq!(run.selection.names, vec!["ps10".to_string()]);
                assert_eq!(run.config, MazeConfig::default());
                assert_eq!(run.frame_ms, 16);
            }
            other => panic!("unexpected command {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn parses_shots_and_rules() -> Result<()> {
        match command(&[
            "--course",
            "ps11",
            "--rules",
            "original",
            "--shot",
            "9@1200",
            "--shot",
            "10@3000",
        ])? {
            Command::Run(run) => {
                assert_eq!(run.config.rules, RulesVariant::Original);
                assert_eq!(run.shots.len(), 2);
                assert_eq!(run.shots[0].item, ItemId(9));
                assert_eq!(run.shots[1].at_ms, 3000);
            }
            other => panic!("unexpected command {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn parses_pause_windows() -> Result<()> {
        match command(&["--pause-at", "5000:1500", "--snapshot-json", "snap.json"])? {
            Command::Run(run) => {
                assert_eq!(
                    run.pauses,
                    vec![PauseWindow {
                        at_ms: 5000,
                        duration_ms: 1500
                    }]
                );
                assert!(run.snapshot_json.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(command(&["--pause-at", "5000"]).is_err());
        Ok(())
    }

    #[test]
    fn dump_course_takes_precedence() -> Result<()> {
        assert!(matches!(
            command(&["--dump-course-json", "out.json"])?,
            Command::DumpCourse(_)
        ));
        Ok(())
    }

    #[test]
    fn rejects_bad_shots_and_zero_frames() {
        assert!(command(&["--shot", "nine@10"]).is_err());
        assert!(command(&["--frame-ms", "0"]).is_err());
    }
}
