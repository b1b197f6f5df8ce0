use std::path::Path;

use arcadia_evaluator::{network::FeedForwardNetwork, snake_features::SnakeFeatureSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained snake policy as written by `train-snake`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct SnakeModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub best_score: u32,
    pub feature_set: SnakeFeatureSet,
    pub network: FeedForwardNetwork,
}

impl SnakeModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let model: Self = util::read_json_file("snake model", path)?;
        let inputs = model.network.layout().inputs;
        let expected = model.feature_set.dimension();
        anyhow::ensure!(
            inputs == expected,
            "Model {} expects {inputs} inputs but its {:?} features produce {expected}",
            path.display(),
            model.feature_set,
        );
        Ok(model)
    }
}
