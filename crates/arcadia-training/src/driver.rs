//! The Population Driver.
//!
//! Runs a fixed number of generations. Every generation:
//!
//! 1. draws one [`GameSeed`] so all candidates face the same initial board
//! 2. evaluates every candidate once and records `(genome, fitness, score)`
//! 3. appends `(best, mean)` fitness to the [`TrainingReport`] and notifies the
//!    [`GenerationReporter`]
//! 4. builds the next generation with the evolver of the current
//!    [`EvolutionPhase`]
//!
//! There is no early stopping. The best genome seen over the whole run is
//! returned alongside the report.
//!
//! # Phase schedule
//!
//! | Phase       | Progress     | Default σ | Default weight bound |
//! |-------------|--------------|-----------|----------------------|
//! | Exploration | < 15 %       | 0.5       | 1.0                  |
//! | Transition  | 15 % to 40 % | 0.2       | 2.0                  |
//! | Convergence | ≥ 40 %       | 0.05      | 3.0                  |

use arcadia_engine::{GameSeed, snake::SnakeConfig};
use arcadia_evaluator::{
    network::{FeedForwardNetwork, NetworkLayout},
    rollout::SnakeEvaluator,
    snake_features::SnakeFeatureSet,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    InvalidTrainingConfig, TrainingError,
    genetic::{EvaluationMode, Population, PopulationEvolver},
    report::{GenerationSummary, TrainingReport},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    /// Phase of `generation` in a run of `total` generations.
    #[must_use]
    pub fn from_progress(generation: usize, total: usize) -> Self {
        // generation / total < 0.15, in integers
        if generation * 100 < total * 15 {
            Self::Exploration
        } else if generation * 10 < total * 4 {
            Self::Transition
        } else {
            Self::Convergence
        }
    }
}

/// Mutation strength and weight bound of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseParams {
    pub max_weight: f32,
    pub mutation_sigma: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Hidden layer sizes of the evolved network.
    pub hidden_layers: Vec<usize>,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub blx_alpha: f32,
    pub mutation_rate: f32,
    pub exploration: PhaseParams,
    pub transition: PhaseParams,
    pub convergence: PhaseParams,
    pub feature_set: SnakeFeatureSet,
    pub evaluation_mode: EvaluationMode,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            generations: 50,
            hidden_layers: vec![16],
            elite_count: 2,
            tournament_size: 3,
            blx_alpha: 0.2,
            mutation_rate: 0.3,
            exploration: PhaseParams {
                max_weight: 1.0,
                mutation_sigma: 0.5,
            },
            transition: PhaseParams {
                max_weight: 2.0,
                mutation_sigma: 0.2,
            },
            convergence: PhaseParams {
                max_weight: 3.0,
                mutation_sigma: 0.05,
            },
            feature_set: SnakeFeatureSet::default(),
            evaluation_mode: EvaluationMode::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), InvalidTrainingConfig> {
        let fail = |reason| Err(InvalidTrainingConfig { reason });
        if self.population_size == 0 {
            return fail("population size must be positive");
        }
        if self.generations == 0 {
            return fail("generation count must be positive");
        }
        if self.hidden_layers.contains(&0) {
            return fail("hidden layers must not be empty");
        }
        let layout = NetworkLayout::new(self.feature_set.dimension(), self.hidden_layers.clone());
        if layout.checked_weight_count().is_none() {
            return fail("hidden layers are too large");
        }
        if self.tournament_size == 0 {
            return fail("tournament size must be positive");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail("mutation rate must be within [0, 1]");
        }
        if !(self.blx_alpha >= 0.0 && self.blx_alpha.is_finite()) {
            return fail("BLX-alpha must be finite and non-negative");
        }
        for params in [self.exploration, self.transition, self.convergence] {
            if !(params.max_weight > 0.0 && params.max_weight.is_finite()) {
                return fail("weight bound must be finite and positive");
            }
            if !(params.mutation_sigma >= 0.0 && params.mutation_sigma.is_finite()) {
                return fail("mutation sigma must be finite and non-negative");
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn phase_params(&self, phase: EvolutionPhase) -> PhaseParams {
        match phase {
            EvolutionPhase::Exploration => self.exploration,
            EvolutionPhase::Transition => self.transition,
            EvolutionPhase::Convergence => self.convergence,
        }
    }

    #[must_use]
    pub fn evolver(&self, phase: EvolutionPhase) -> PopulationEvolver {
        let PhaseParams {
            max_weight,
            mutation_sigma,
        } = self.phase_params(phase);
        PopulationEvolver {
            elite_count: self.elite_count,
            max_weight,
            tournament_size: self.tournament_size,
            mutation_sigma,
            blx_alpha: self.blx_alpha,
            mutation_rate: self.mutation_rate,
        }
    }
}

/// Receives the summary of every generation as soon as it is evaluated.
pub trait GenerationReporter {
    fn report_generation(&mut self, summary: &GenerationSummary);
}

impl<F> GenerationReporter for F
where
    F: FnMut(&GenerationSummary),
{
    fn report_generation(&mut self, summary: &GenerationSummary) {
        self(summary);
    }
}

/// Result of a full training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub report: TrainingReport,
    /// Best network seen in any generation.
    pub champion: FeedForwardNetwork,
    pub champion_fitness: f32,
    pub champion_score: u32,
    pub champion_generation: usize,
}

#[derive(Debug, Clone)]
pub struct PopulationDriver {
    config: TrainingConfig,
    evaluator: SnakeEvaluator,
}

impl PopulationDriver {
    pub fn new(config: TrainingConfig, snake: SnakeConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let evaluator = SnakeEvaluator::new(snake, config.feature_set);
        Ok(Self { config, evaluator })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        NetworkLayout::new(
            self.config.feature_set.dimension(),
            self.config.hidden_layers.clone(),
        )
    }

    /// Runs every generation and returns the report with the best network.
    pub fn run<R, G>(&self, rng: &mut R, reporter: &mut G) -> Result<TrainingOutcome, TrainingError>
    where
        R: Rng + ?Sized,
        G: GenerationReporter + ?Sized,
    {
        let config = &self.config;
        let mut population = Population::random(
            self.layout(),
            config.population_size,
            rng,
            config.exploration.max_weight,
        );
        let mut report = TrainingReport::new();
        let mut champion: Option<(FeedForwardNetwork, f32, u32, usize)> = None;

        for generation in 0..config.generations {
            let phase = EvolutionPhase::from_progress(generation, config.generations);
            let seed: GameSeed = rng.random();
            let records = population.evaluate_fitness(&self.evaluator, seed, config.evaluation_mode)?;

            #[expect(clippy::cast_precision_loss)]
            let mean_fitness =
                records.iter().map(|r| r.fitness()).sum::<f32>() / records.len() as f32;
            let best = &records[0];
            let summary = GenerationSummary {
                generation,
                phase,
                best_fitness: best.fitness(),
                mean_fitness,
                best_score: best.score(),
            };
            tracing::info!(
                generation,
                ?phase,
                %seed,
                best = summary.best_fitness,
                mean = summary.mean_fitness,
                best_score = summary.best_score,
                "generation evaluated"
            );

            if champion
                .as_ref()
                .is_none_or(|(_, fitness, _, _)| best.fitness() > *fitness)
            {
                let individual = &population.individuals()[0];
                champion = Some((
                    population.network(individual)?,
                    best.fitness(),
                    best.score(),
                    generation,
                ));
            }

            reporter.report_generation(&summary);
            report.push(summary);

            if generation + 1 < config.generations {
                population = config.evolver(phase).evolve(&population, rng);
            }
        }

        let (champion, champion_fitness, champion_score, champion_generation) =
            champion.expect("at least one generation is evaluated");
        Ok(TrainingOutcome {
            report,
            champion,
            champion_fitness,
            champion_score,
            champion_generation,
        })
    }
}
