use std::path::PathBuf;

use arcadia_engine::GameSeed;
use arcadia_evaluator::snake_features::SnakeFeatureSet;
use arcadia_training::{
    driver::PopulationDriver, genetic::EvaluationMode, report::GenerationSummary,
};
use chrono::Utc;
use rand::Rng as _;

use crate::{config::AppConfig, model::snake_model::SnakeModel, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainSnakeArg {
    /// Number of generations (overrides the config file)
    #[arg(long)]
    generations: Option<usize>,
    /// Individuals per generation (overrides the config file)
    #[arg(long)]
    population: Option<usize>,
    /// State features fed to the network: full or compact
    #[arg(long)]
    features: Option<SnakeFeatureSet>,
    /// Evaluate each generation on one thread per individual
    #[arg(long)]
    parallel: bool,
    /// Seed of the whole run (32 hex characters)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Name stored in the model file
    #[arg(long, default_value = "snake")]
    name: String,
    /// Output file path for the model; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output file path for the per-generation fitness report
    #[arg(long)]
    report: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainSnakeArg, config: &AppConfig) -> anyhow::Result<()> {
    let TrainSnakeArg {
        generations,
        population,
        features,
        parallel,
        seed,
        name,
        output,
        report,
    } = arg;

    let mut training = config.training.clone();
    if let Some(generations) = generations {
        training.generations = *generations;
    }
    if let Some(population) = population {
        training.population_size = *population;
    }
    if let Some(features) = features {
        training.feature_set = *features;
    }
    if *parallel {
        training.evaluation_mode = EvaluationMode::Parallel;
    }
    let feature_set = training.feature_set;

    let driver = PopulationDriver::new(training, config.snake.clone())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(
        %seed,
        generations = driver.config().generations,
        population = driver.config().population_size,
        features = ?feature_set,
        mode = %driver.config().evaluation_mode,
        "starting snake training"
    );

    let mut best_score = 0;
    let mut rng = seed.rng();
    let outcome = driver.run(&mut rng, &mut |summary: &GenerationSummary| {
        if summary.best_score > best_score {
            best_score = summary.best_score;
            tracing::info!(
                generation = summary.generation,
                score = best_score,
                "new best score"
            );
        }
    })?;

    tracing::info!(
        fitness = outcome.champion_fitness,
        score = outcome.champion_score,
        generation = outcome.champion_generation,
        "snake training completed"
    );

    let model = SnakeModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness: outcome.champion_fitness,
        best_score: outcome.champion_score,
        feature_set,
        network: outcome.champion,
    };
    util::save_json(&model, output.as_deref())?;
    tracing::info!(
        path = %output.as_ref().map_or_else(|| "stdout".to_owned(), |p| p.display().to_string()),
        name = %model.name,
        trained_at = %model.trained_at,
        "model saved"
    );

    if let Some(path) = report {
        util::save_json(&outcome.report, Some(path.as_path()))?;
        tracing::info!(path = %path.display(), "training report saved");
    }

    Ok(())
}
