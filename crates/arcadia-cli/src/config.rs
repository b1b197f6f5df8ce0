use std::path::Path;

use anyhow::Context as _;

use arcadia_engine::{runner::RunnerConfig, snake::SnakeConfig};
use arcadia_evaluator::heuristic::ThresholdConfig;
use arcadia_training::driver::TrainingConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Settings file accepted by `--config`. Missing sections and fields keep their
/// defaults.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub runner: RunnerConfig,
    pub thresholds: ThresholdConfig,
    pub snake: SnakeConfig,
    pub training: TrainingConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: Self = util::read_json_file("config", path)?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Checks every section before any simulation is built from it.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.runner.validate()?;
        let base_speed = self.thresholds.base_speed;
        anyhow::ensure!(
            base_speed > 0.0 && base_speed.is_finite(),
            "threshold base speed must be finite and positive, got {base_speed}"
        );
        self.snake.validate()?;
        self.training.validate()?;
        Ok(())
    }
}
