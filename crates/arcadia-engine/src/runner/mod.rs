//! Endless-runner world simulation.
//!
//! The runner world is advanced by [`RunnerWorld::step`], one tick per frame:
//!
//! 1. The chosen [`RunnerAction`] is applied to the [`Agent`] (jump, duck or run)
//! 2. The agent integrates its jump arc or settles into its running/ducking pose
//! 3. The [`DifficultyController`] decides whether a new obstacle spawns
//! 4. Obstacles slide left at the current difficulty speed; obstacles leaving the
//!    screen are removed and scored
//! 5. Any bounding-box overlap between agent and obstacle ends the episode
//!
//! Policies never see the world itself, only the immutable [`RunnerSnapshot`]
//! produced by [`RunnerWorld::snapshot`] at the start of each tick.
//!
//! # Example
//!
//! ```
//! use arcadia_engine::{
//!     GameSeed,
//!     runner::{RunnerAction, RunnerConfig, RunnerWorld},
//! };
//!
//! let mut world = RunnerWorld::new(RunnerConfig::default(), GameSeed::from_u128(7));
//! let snapshot = world.snapshot();
//! assert_eq!(snapshot.score, 0);
//!
//! let step = world.step(RunnerAction::Run);
//! assert!(!step.crashed);
//! ```

pub use self::{agent::*, config::*, difficulty::*, obstacle::*, snapshot::*, world::*};

mod agent;
mod config;
mod difficulty;
mod obstacle;
mod snapshot;
mod world;
