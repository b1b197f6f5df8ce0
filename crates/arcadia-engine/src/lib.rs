//! World simulators for the arcadia agents.
//!
//! Two independent games live here, each advanced one discrete tick at a time:
//!
//! - [`runner`] - an endless runner where the agent jumps or ducks over obstacles
//!   whose spacing and speed come from a [`runner::DifficultyController`]
//! - [`snake`] - a grid snake steered by relative turns
//!
//! Both simulators are fully headless. Rendering, input and plotting are external
//! collaborators that only read the snapshots exposed here.

pub use self::{geometry::*, seed::*};

pub mod geometry;
pub mod runner;
pub mod seed;
pub mod snake;

/// A snake game could not be set up from the given layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SnakeSetupError {
    #[display("snake body must contain at least one cell")]
    EmptyBody,
    #[display("snake cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[display("snake cell ({x}, {y}) is not aligned to the grid")]
    Unaligned { x: i32, y: i32 },
    #[display("snake cell ({x}, {y}) is occupied twice")]
    OverlappingBody { x: i32, y: i32 },
    #[display("food cell ({x}, {y}) is invalid or on the snake body")]
    InvalidFood { x: i32, y: i32 },
    #[display("board has no free cell for food")]
    BoardTooSmall,
    #[display("board of {width}x{height} cannot hold blocks of size {block_size}")]
    InvalidBoard {
        width: i32,
        height: i32,
        block_size: i32,
    },
}

/// A runner parameter is out of its usable range.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid runner configuration: {reason}")]
pub struct InvalidRunnerConfig {
    pub reason: &'static str,
}
