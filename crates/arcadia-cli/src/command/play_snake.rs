use std::path::PathBuf;

use arcadia_engine::GameSeed;
use arcadia_evaluator::{
    greedy::GreedyFoodPolicy,
    policy::Policy,
    rollout::{GenomeId, SnakeEvaluator},
    snake_features::SnakeFeatureSet,
};
use rand::Rng as _;

use crate::{config::AppConfig, model::snake_model::SnakeModel};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlaySnakeArg {
    /// Model written by `train-snake`; the greedy baseline plays when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 5)]
    rollouts: u64,
    /// Seed the game seeds are drawn from (32 hex characters)
    #[arg(long)]
    seed: Option<GameSeed>,
}

pub(crate) fn run(arg: &PlaySnakeArg, config: &AppConfig) -> anyhow::Result<()> {
    let PlaySnakeArg {
        model,
        rollouts,
        seed,
    } = arg;

    let loaded = model.as_ref().map(SnakeModel::open).transpose()?;
    let feature_set = loaded
        .as_ref()
        .map_or(SnakeFeatureSet::Full, |model| model.feature_set);
    let mut policy: Box<dyn Policy<Input = [f32]>> = match loaded {
        Some(model) => {
            tracing::info!(
                name = %model.name,
                trained_at = %model.trained_at,
                fitness = model.final_fitness,
                "loaded snake model"
            );
            Box::new(model.network)
        }
        None => {
            tracing::info!("no model given, playing the greedy baseline");
            Box::new(GreedyFoodPolicy)
        }
    };

    let evaluator = SnakeEvaluator::new(config.snake.clone(), feature_set);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.rng();
    let mut total_score = 0;
    let mut total_fitness = 0.0;
    for game in 0..*rollouts {
        let game_seed: GameSeed = rng.random();
        let record = evaluator.evaluate(GenomeId(game), policy.as_mut(), game_seed)?;
        tracing::info!(
            game,
            seed = %game_seed,
            score = record.score(),
            fitness = record.fitness(),
            ticks = record.ticks(),
            outcome = ?record.outcome(),
            "game finished"
        );
        total_score += record.score();
        total_fitness += record.fitness();
    }

    #[expect(clippy::cast_precision_loss)]
    let games = (*rollouts).max(1) as f32;
    tracing::info!(
        %seed,
        games = rollouts,
        mean_score = f64::from(total_score) / f64::from(games),
        mean_fitness = total_fitness / games,
        "snake summary"
    );
    Ok(())
}
