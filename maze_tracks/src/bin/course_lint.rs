use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use maze_tracks::{builtin_course, lint_course, Course, Finding, RulesVariant};

/// Check target-track tables for sequences that misbehave at runtime.
#[derive(Parser, Debug)]
#[command(about = "Lint police maze course tables", version)]
struct Args {
    /// Course JSON files or built-in course names (ps10 to ps13)
    #[arg(required = true)]
    courses: Vec<String>,

    /// Table variant used for built-in courses
    #[arg(long, value_enum, default_value_t = RulesVariant::Restored)]
    rules: RulesVariant,

    /// Print findings as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut findings: Vec<Finding> = Vec::new();
    for name in &args.courses {
        let course = resolve(name, args.rules)?;
        findings.extend(lint_course(&course));
    }

    if args.json {
        let json = serde_json::to_string_pretty(&findings).context("serializing findings")?;
        println!("{json}");
    } else {
        for finding in &findings {
            let opcode = finding
                .opcode
                .map(|opcode| opcode.mnemonic())
                .unwrap_or("<end>");
            println!(
                "{scene} {track} @{index:<3} {opcode:<18} {kind:?}",
                scene = finding.scene,
                track = finding.track,
                index = finding.index,
                kind = finding.kind
            );
        }
        println!("{} finding(s)", findings.len());
    }

    Ok(if findings.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn resolve(name: &str, rules: RulesVariant) -> Result<Course> {
    if let Some(course) = builtin_course(name, rules) {
        return Ok(course);
    }
    Course::from_json_file(Path::new(name))
}
