//! Grid snake steered by relative turns.
//!
//! The board is a grid of `block_size` cells addressed by the pixel coordinate of
//! their top-left corner. Every [`SnakeGame::step`] moves the head one cell in the
//! direction obtained by applying a [`Turn`] to the current heading.

pub use self::{config::*, direction::*, game::*};

mod config;
mod direction;
mod game;
