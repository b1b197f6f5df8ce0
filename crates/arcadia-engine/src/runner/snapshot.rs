use serde::{Deserialize, Serialize};

use crate::Rect;

use super::{AgentMode, ObstacleDescriptor};

/// Agent state as seen by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: f32,
    pub mode: AgentMode,
}

impl AgentPose {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Read-only view of the runner world at the start of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerSnapshot {
    pub agent: AgentPose,
    /// Obstacles in spawn order, oldest first.
    pub obstacles: Vec<ObstacleDescriptor>,
    pub score: u32,
    pub tick: u64,
    /// Elapsed game time in seconds.
    pub elapsed: f32,
    pub speed: f32,
    pub ground_y: f32,
}
