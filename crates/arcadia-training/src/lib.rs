//! Neuroevolution of snake policies.
//!
//! This crate is the evolution library and the Population Driver that sit on top
//! of the snake evaluator:
//!
//! - [`weights`] - genome initialisation, BLX-α crossover and Gaussian mutation
//! - [`genetic`] - populations, fitness evaluation and generation building
//! - [`driver`] - the generation loop with its phase schedule
//! - [`report`] - the per-generation `(best, mean)` fitness series returned by a run
//!
//! Each candidate plays a freshly seeded [`SnakeGame`](arcadia_engine::snake::SnakeGame)
//! so candidates share nothing but the population roster.

use arcadia_evaluator::{network::PolicyDecodeError, rollout::RolloutError};

pub mod driver;
pub mod genetic;
pub mod report;
pub mod weights;

/// A training parameter is out of its usable range.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid training configuration: {reason}")]
pub struct InvalidTrainingConfig {
    pub reason: &'static str,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("rollout failed: {_0}")]
    Rollout(RolloutError),
    #[display("cannot build network: {_0}")]
    Network(PolicyDecodeError),
    #[display("{_0}")]
    Config(InvalidTrainingConfig),
}
