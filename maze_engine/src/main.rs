use anyhow::Result;

mod audio_bridge;
mod cli;
mod config;
mod events;
mod items;
mod maze;
mod player;
mod runtime;
mod scene;
mod scheduler;
mod state;
mod world;

use cli::Command;

fn main() -> Result<()> {
    env_logger::init();

    match cli::parse()? {
        Command::Run(args) => runtime::execute(args),
        Command::DumpCourse(args) => runtime::dump_course(args),
    }
}
