use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use self::{play_snake::PlaySnakeArg, run_dino::RunDinoArg, train_snake::TrainSnakeArg};
use crate::config::AppConfig;

mod play_snake;
mod run_dino;
mod train_snake;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play headless runner sessions with the heuristic controller
    RunDino(#[clap(flatten)] RunDinoArg),
    /// Evolve a snake network with the genetic algorithm
    TrainSnake(#[clap(flatten)] TrainSnakeArg),
    /// Evaluate a saved snake model, or the greedy baseline
    PlaySnake(#[clap(flatten)] PlaySnakeArg),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    let config = AppConfig::load(args.config.as_deref())?;
    match args.mode {
        Mode::RunDino(arg) => run_dino::run(&arg, &config)?,
        Mode::TrainSnake(arg) => train_snake::run(&arg, &config)?,
        Mode::PlaySnake(arg) => play_snake::run(&arg, &config)?,
    }
    Ok(())
}
