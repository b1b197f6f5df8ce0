//! Policies and rollout scoring for the arcadia games.
//!
//! Every controller in this crate, hand-written or evolved, implements the same
//! [`policy::Policy`] interface: given an input, produce one score per discrete
//! action. The highest score wins and ties go to the first action.
//!
//! # Runner
//!
//! - [`heuristic`] - the adaptive-threshold controller. Its distance thresholds
//!   scale with game speed so that the time left to react stays constant.
//! - [`runner_session`] - plays a runner policy headlessly until it crashes or
//!   reaches a tick limit.
//!
//! # Snake
//!
//! - [`snake_features`] - turns a [`arcadia_engine::snake::SnakeGame`] into the
//!   11-value (full) or 7-value (compact) feature vector.
//! - [`network`] - the evolved feed-forward network policy.
//! - [`greedy`] - a hand-coded baseline that walks toward food and away from danger.
//! - [`rollout`] - plays a snake policy to the end and accumulates its fitness.
//!
//! ```text
//! SnakeGame ──features──▶ Policy::scores ──arg max──▶ Turn ──▶ SnakeGame::step
//!     └────────────── reward ──▶ FitnessRecord
//! ```

pub mod greedy;
pub mod heuristic;
pub mod network;
pub mod policy;
pub mod rollout;
pub mod runner_session;
pub mod snake_features;
