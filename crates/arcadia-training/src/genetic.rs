//! Genetic algorithm over network genomes.
//!
//! One generation runs through:
//!
//! 1. **Evaluate** - every individual plays one snake rollout and gets a
//!    [`FitnessRecord`]; the population is then sorted best first
//! 2. **Elitism** - the top `elite_count` individuals are copied unchanged
//! 3. **Tournament selection** - two parents are picked, each the fittest of
//!    `tournament_size` random individuals
//! 4. **BLX-α crossover** and **Gaussian mutation** produce the child genome
//!
//! Rollouts share nothing but the read-only evaluator, so evaluation can run on
//! one thread or on one scoped thread per individual ([`EvaluationMode`]).
//! Both modes produce the same records for the same seed.

use std::{panic, thread};

use arcadia_engine::GameSeed;
use arcadia_evaluator::{
    network::{FeedForwardNetwork, NetworkLayout},
    rollout::{FitnessRecord, GenomeId, SnakeEvaluator},
};
use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{TrainingError, weights};

/// How a population's rollouts are scheduled.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum EvaluationMode {
    #[default]
    #[display("sequential")]
    Sequential,
    #[display("parallel")]
    Parallel,
}

/// A candidate genome and the result of its latest rollout.
#[derive(Debug, Clone)]
pub struct Individual {
    id: GenomeId,
    weights: Vec<f32>,
    fitness: f32,
    score: u32,
}

impl Individual {
    fn new(id: GenomeId, weights: Vec<f32>) -> Self {
        Self {
            id,
            weights,
            fitness: f32::MIN,
            score: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> GenomeId {
        self.id
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    fn network(&self, layout: &NetworkLayout) -> Result<FeedForwardNetwork, TrainingError> {
        Ok(FeedForwardNetwork::new(layout.clone(), self.weights.clone())?)
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    layout: NetworkLayout,
    individuals: Vec<Individual>,
    next_id: u64,
}

impl Population {
    /// Creates `count` individuals with weights drawn from `[-max_weight, max_weight]`.
    #[must_use]
    pub fn random<R>(layout: NetworkLayout, count: usize, rng: &mut R, max_weight: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let weight_count = layout.weight_count();
        let individuals = (0..count as u64)
            .map(|id| Individual::new(GenomeId(id), weights::random(rng, max_weight, weight_count)))
            .collect();
        Self {
            layout,
            individuals,
            next_id: count as u64,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    /// Individuals, best first once evaluated.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Builds the network of an individual of this population.
    pub fn network(&self, individual: &Individual) -> Result<FeedForwardNetwork, TrainingError> {
        individual.network(&self.layout)
    }

    /// Plays one rollout per individual on games seeded with `seed`, stores the
    /// results and sorts the population by fitness, best first.
    ///
    /// The returned records are in the same order as the sorted population.
    pub fn evaluate_fitness(
        &mut self,
        evaluator: &SnakeEvaluator,
        seed: GameSeed,
        mode: EvaluationMode,
    ) -> Result<Vec<FitnessRecord>, TrainingError> {
        let layout = &self.layout;
        let evaluate_one = |individual: &Individual| -> Result<FitnessRecord, TrainingError> {
            let mut network = individual.network(layout)?;
            Ok(evaluator.evaluate(individual.id, &mut network, seed)?)
        };

        let records = match mode {
            EvaluationMode::Sequential => self
                .individuals
                .iter()
                .map(evaluate_one)
                .collect::<Result<Vec<_>, _>>()?,
            EvaluationMode::Parallel => thread::scope(|s| {
                let evaluate_one = &evaluate_one;
                let handles = self
                    .individuals
                    .iter()
                    .map(|individual| s.spawn(move || evaluate_one(individual)))
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                    .collect::<Result<Vec<_>, _>>()
            })?,
        };

        for (individual, record) in self.individuals.iter_mut().zip(&records) {
            individual.fitness = record.fitness();
            individual.score = record.score();
        }
        let mut pairs = self
            .individuals
            .drain(..)
            .zip(records)
            .collect::<Vec<_>>();
        pairs.sort_by(|(a, _), (b, _)| b.fitness.total_cmp(&a.fitness));
        let (individuals, records) = pairs.into_iter().unzip();
        self.individuals = individuals;
        Ok(records)
    }
}

/// Parameters for producing the next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEvolver {
    /// Individuals copied unchanged into the next generation.
    pub elite_count: usize,
    /// Weights are clipped to `[-max_weight, max_weight]`.
    pub max_weight: f32,
    pub tournament_size: usize,
    pub mutation_sigma: f32,
    pub blx_alpha: f32,
    /// Probability of mutating each weight.
    pub mutation_rate: f32,
}

impl PopulationEvolver {
    /// Builds the next generation from the fitness currently stored in
    /// `population`.
    ///
    /// 1. The `elite_count` fittest individuals are copied unchanged
    /// 2. The remaining slots are filled with children of two tournament
    ///    winners, crossed over with BLX-α and then mutated
    ///
    /// The population does not have to be sorted; elites are ranked here.
    /// Individuals that were never evaluated rank last.
    ///
    /// # Returns
    ///
    /// A population of the same size and layout. Elites keep their ids and
    /// children get fresh ones.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let parents = &population.individuals;
        let count = parents.len();

        let mut ranking: Vec<&Individual> = parents.iter().collect();
        ranking.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let mut next_individuals = Vec::with_capacity(count);
        next_individuals.extend(ranking.into_iter().take(self.elite_count).cloned());

        let mut next_id = population.next_id;
        while next_individuals.len() < count {
            let p1 = tournament_select(parents, self.tournament_size, rng);
            let p2 = tournament_select(parents, self.tournament_size, rng);

            let mut child = weights::blx_alpha(
                &p1.weights,
                &p2.weights,
                self.blx_alpha,
                self.max_weight,
                rng,
            );
            weights::mutate(
                &mut child,
                self.mutation_sigma,
                self.max_weight,
                self.mutation_rate,
                rng,
            );

            next_individuals.push(Individual::new(GenomeId(next_id), child));
            next_id += 1;
        }

        Population {
            layout: population.layout.clone(),
            individuals: next_individuals,
            next_id,
        }
    }
}

/// Returns the fittest of `tournament_size` distinct random individuals.
///
/// A size of zero is treated as one, and a size above the population length
/// makes every individual compete.
///
/// # Panics
///
/// Panics if `population` is empty.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size.max(1))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament needs at least one individual")
}
