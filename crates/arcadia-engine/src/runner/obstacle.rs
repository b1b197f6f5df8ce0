use serde::{Deserialize, Serialize};

use crate::Rect;

/// Identifier assigned to obstacles in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// An obstacle travelling toward the agent.
///
/// Created by the world when the difficulty controller allows a spawn and dropped
/// once it leaves the left edge of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDescriptor {
    pub id: ObstacleId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal gap the next obstacle must wait for behind this one.
    pub spawn_distance: f32,
}

impl ObstacleDescriptor {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns `true` once the obstacle has fully left the world on the left side.
    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.x < -self.width
    }
}
