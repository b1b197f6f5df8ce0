use arcadia_engine::{GameSeed, runner::RunnerWorld};
use arcadia_evaluator::{heuristic::DinoController, runner_session::play_runner_session};
use rand::Rng as _;

use crate::config::AppConfig;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunDinoArg {
    /// Number of sessions; each restarts from a fresh world
    #[arg(long, default_value_t = 5)]
    sessions: usize,
    /// Tick limit per session (60 ticks per second)
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    /// Seed the session seeds are drawn from (32 hex characters)
    #[arg(long)]
    seed: Option<GameSeed>,
}

pub(crate) fn run(arg: &RunDinoArg, config: &AppConfig) -> anyhow::Result<()> {
    let RunDinoArg {
        sessions,
        max_ticks,
        seed,
    } = arg;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%seed, sessions, max_ticks, "starting runner sessions");

    let mut rng = seed.rng();
    let mut total_score = 0;
    let mut best_score = 0;
    let mut crashes = 0;
    for session in 0..*sessions {
        let session_seed: GameSeed = rng.random();
        let world = RunnerWorld::new(config.runner.clone(), session_seed);
        let mut controller = DinoController::new(config.thresholds.clone(), config.runner.jump);
        let stats = play_runner_session(world, &mut controller, *max_ticks)?;

        tracing::info!(
            session,
            seed = %session_seed,
            ticks = stats.ticks,
            score = stats.score,
            elapsed = format_args!("{:.1}s", stats.elapsed),
            speed = stats.final_speed,
            jumps = stats.jumps,
            ducks = stats.ducks,
            crashed = stats.crashed,
            "session finished"
        );
        total_score += stats.score;
        best_score = best_score.max(stats.score);
        if stats.crashed {
            crashes += 1;
        }
    }

    #[expect(clippy::cast_precision_loss)]
    let mean_score = f64::from(total_score) / (*sessions).max(1) as f64;
    tracing::info!(
        sessions,
        mean_score = format_args!("{mean_score:.2}"),
        best_score,
        crashes,
        "runner summary"
    );
    Ok(())
}
