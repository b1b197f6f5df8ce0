use serde::{Deserialize, Serialize};

use crate::driver::EvolutionPhase;

/// Fitness statistics of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub phase: EvolutionPhase,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    /// Food captured by the best genome of the generation.
    pub best_score: u32,
}

/// Per-generation series produced by a training run.
///
/// The report is returned by value from the driver; nothing accumulates in
/// process-wide state.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    generations: Vec<GenerationSummary>,
}

impl TrainingReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, summary: GenerationSummary) {
        self.generations.push(summary);
    }

    #[must_use]
    pub fn generations(&self) -> &[GenerationSummary] {
        &self.generations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationSummary> {
        self.generations.last()
    }

    /// `(best, mean)` fitness pairs in generation order.
    pub fn fitness_series(&self) -> impl ExactSizeIterator<Item = (f32, f32)> + '_ {
        self.generations
            .iter()
            .map(|g| (g.best_fitness, g.mean_fitness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(generation: usize, best: f32, mean: f32) -> GenerationSummary {
        GenerationSummary {
            generation,
            phase: EvolutionPhase::Exploration,
            best_fitness: best,
            mean_fitness: mean,
            best_score: 0,
        }
    }

    #[test]
    fn test_series_keeps_generation_order() {
        let mut report = TrainingReport::new();
        assert!(report.is_empty());
        report.push(summary(0, 5.0, 1.0));
        report.push(summary(1, 7.5, 2.5));

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.fitness_series().collect::<Vec<_>>(),
            vec![(5.0, 1.0), (7.5, 2.5)]
        );
        assert_eq!(report.last().map(|g| g.generation), Some(1));
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = TrainingReport::new();
        report.push(summary(0, 5.0, 1.0));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generations"][0]["phase"], "Exploration");
        assert_eq!(json["generations"][0]["best_fitness"], 5.0);
    }
}
