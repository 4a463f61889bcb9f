//! Replay a scripted editing session and print the resulting shapes.

mod script;

use clap::Parser;
use script::{ReplayError, load_config, load_script, replay};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay a parceldraw pointer session and print the resulting shapes as JSON
#[derive(Parser)]
#[command(name = "parceldraw-replay")]
#[command(about = "Replays scripted pointer sessions through the parceldraw editor")]
struct Args {
    /// JSON script of pointer and editor steps
    script: PathBuf,

    /// Editor configuration overriding the script's own
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), ReplayError> {
    let mut script = load_script(&args.script)?;
    if let Some(path) = &args.config {
        script.config = Some(load_config(path)?);
    }
    let output = replay(&script)?;
    log::info!(
        "Replayed {} steps: {} shapes, {} draw commands",
        script.steps.len(),
        output.shapes.len(),
        output.draw_commands
    );
    let json = serde_json::to_string_pretty(&output).map_err(ReplayError::Output)?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
