//! Adaptive-threshold controller for the endless runner.
//!
//! # Decision rule
//!
//! Every tick the controller looks at the nearest obstacle strictly ahead of the
//! agent and measures `distance = obstacle.x - agent.x`. Decisions are taken in
//! this order:
//!
//! 1. A reaction delay is pending: repeat the previous decision
//! 2. No obstacle ahead, or `distance > decision_distance`: run
//! 3. The obstacle stands on the ground and `distance <= jump + margin`, and the
//!    agent is neither jumping nor ducking: jump
//! 4. The obstacle floats above ducking height and `distance <= duck + margin`,
//!    and the agent is not jumping: duck
//! 5. Otherwise: run
//!
//! Choosing jump or duck arms the reaction delay, so the same decision is
//! returned for the next `reaction_delay` calls without looking at the world.
//!
//! # Adaptive thresholds
//!
//! All three distances scale with `speed / base_speed`:
//!
//! ```text
//! threshold(speed) = threshold(base_speed) * speed / base_speed
//! ```
//!
//! An obstacle therefore always enters each zone the same number of ticks before
//! it reaches the agent, however fast the game runs.
//!
//! # Example
//!
//! ```
//! use arcadia_evaluator::heuristic::ThresholdConfig;
//!
//! let config = ThresholdConfig::default();
//! let at_double_speed = config.scaled(14.0);
//! assert_eq!(at_double_speed.jump, 240.0);
//! assert_eq!(at_double_speed.decision, 400.0);
//! ```

use arcadia_engine::{
    Rect,
    runner::{JumpKinematics, ObstacleDescriptor, RunnerAction, RunnerSnapshot},
};
use serde::{Deserialize, Serialize};

use crate::policy::{InvalidStateShape, Policy, one_hot};

/// Base distances of the heuristic controller, measured at `base_speed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub base_speed: f32,
    pub decision_distance: f32,
    pub jump_threshold: f32,
    pub duck_threshold: f32,
    pub safety_margin: f32,
    /// Ticks the previous jump/duck decision is held before re-evaluating.
    pub reaction_delay: u32,
    /// An obstacle whose top is within this many pixels of standing height counts
    /// as being on the ground.
    pub ground_tolerance: f32,
    /// An obstacle must float at least this many pixels above standing height to
    /// be ducked under.
    pub duck_clearance: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            base_speed: 7.0,
            decision_distance: 200.0,
            jump_threshold: 120.0,
            duck_threshold: 100.0,
            safety_margin: 10.0,
            reaction_delay: 2,
            ground_tolerance: 10.0,
            duck_clearance: 30.0,
        }
    }
}

impl ThresholdConfig {
    /// Thresholds adjusted to the current game speed.
    #[must_use]
    pub fn scaled(&self, speed: f32) -> AdaptiveThresholds {
        let multiplier = speed / self.base_speed;
        AdaptiveThresholds {
            decision: self.decision_distance * multiplier,
            jump: self.jump_threshold * multiplier,
            duck: self.duck_threshold * multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThresholds {
    pub decision: f32,
    pub jump: f32,
    pub duck: f32,
}

/// The obstacle the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestObstacle {
    pub obstacle: ObstacleDescriptor,
    pub distance: f32,
}

/// Predicted outcome of keeping the current trajectory until the nearest
/// obstacle reaches the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRisk {
    pub colliding: bool,
    pub ticks_to_collision: f32,
}

/// Values a renderer can draw on top of the runner scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugOverlay {
    pub last_action: RunnerAction,
    pub speed: f32,
    pub elapsed: f32,
    pub nearest_distance: Option<f32>,
    pub thresholds: AdaptiveThresholds,
    /// Horizontal gap between the two oldest obstacles.
    pub obstacle_spacing: Option<f32>,
    pub collision_risk: Option<CollisionRisk>,
}

/// Rule-based runner controller with speed-scaled thresholds and a reaction delay.
#[derive(Debug, Clone)]
pub struct DinoController {
    config: ThresholdConfig,
    kinematics: JumpKinematics,
    last_action: RunnerAction,
    pending_delay: u32,
}

impl DinoController {
    #[must_use]
    pub fn new(config: ThresholdConfig, kinematics: JumpKinematics) -> Self {
        Self {
            config,
            kinematics,
            last_action: RunnerAction::Run,
            pending_delay: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    #[must_use]
    pub fn last_action(&self) -> RunnerAction {
        self.last_action
    }

    /// Chooses the action for this tick.
    pub fn decide(&mut self, snapshot: &RunnerSnapshot) -> RunnerAction {
        if self.pending_delay > 0 {
            self.pending_delay -= 1;
            return self.last_action;
        }

        let action = match nearest_obstacle(snapshot) {
            Some(nearest) => self.react_to(snapshot, &nearest),
            None => RunnerAction::Run,
        };
        if action != RunnerAction::Run {
            self.pending_delay = self.config.reaction_delay;
        }
        self.last_action = action;

        if tracing::enabled!(tracing::Level::TRACE) {
            let overlay = self.overlay(snapshot);
            tracing::trace!(tick = snapshot.tick, ?overlay, "runner decision");
        }
        action
    }

    fn react_to(&self, snapshot: &RunnerSnapshot, nearest: &NearestObstacle) -> RunnerAction {
        let thresholds = self.config.scaled(snapshot.speed);
        if nearest.distance > thresholds.decision {
            RunnerAction::Run
        } else if self.should_jump(snapshot, nearest, &thresholds) {
            RunnerAction::Jump
        } else if self.should_duck(snapshot, nearest, &thresholds) {
            RunnerAction::Duck
        } else {
            RunnerAction::Run
        }
    }

    fn should_jump(
        &self,
        snapshot: &RunnerSnapshot,
        nearest: &NearestObstacle,
        thresholds: &AdaptiveThresholds,
    ) -> bool {
        let mode = snapshot.agent.mode;
        if mode.is_jumping() || mode.is_ducking() {
            return false;
        }
        let obstacle = &nearest.obstacle;
        let on_ground =
            obstacle.y >= snapshot.ground_y - obstacle.height - self.config.ground_tolerance;
        on_ground && nearest.distance <= thresholds.jump + self.config.safety_margin
    }

    fn should_duck(
        &self,
        snapshot: &RunnerSnapshot,
        nearest: &NearestObstacle,
        thresholds: &AdaptiveThresholds,
    ) -> bool {
        if snapshot.agent.mode.is_jumping() {
            return false;
        }
        let obstacle = &nearest.obstacle;
        let elevated =
            obstacle.y < snapshot.ground_y - obstacle.height - self.config.duck_clearance;
        elevated && nearest.distance <= thresholds.duck + self.config.safety_margin
    }

    /// Predicts whether the agent would hit `nearest` if it kept its current
    /// trajectory.
    ///
    /// The obstacle is moved to the agent's column after
    /// `ticks = distance / speed` ticks, and a jumping agent is advanced along
    /// the same arc the simulator integrates, clamped between the apex and the
    /// standing position.
    #[must_use]
    pub fn collision_risk(
        &self,
        snapshot: &RunnerSnapshot,
        nearest: &NearestObstacle,
    ) -> CollisionRisk {
        let agent = &snapshot.agent;
        let ticks = nearest.distance / snapshot.speed.max(f32::EPSILON);

        let predicted_y = if agent.mode.is_jumping() {
            let standing_y = snapshot.ground_y - agent.height;
            let apex_y = standing_y - self.apex_height();
            (agent.y - self.kinematics.displacement(agent.velocity, ticks)).clamp(apex_y, standing_y)
        } else {
            agent.y
        };

        let agent_rect = Rect::new(agent.x, predicted_y, agent.width, agent.height);
        let obstacle = &nearest.obstacle;
        let obstacle_rect = Rect::new(agent.x, obstacle.y, obstacle.width, obstacle.height);
        CollisionRisk {
            colliding: agent_rect.intersects(&obstacle_rect),
            ticks_to_collision: ticks,
        }
    }

    fn apex_height(&self) -> f32 {
        let k = &self.kinematics;
        let rising_ticks = (k.initial_velocity / k.deceleration).floor();
        k.displacement(k.initial_velocity, rising_ticks)
    }

    /// Diagnostic values for the current tick. Does not change any state.
    #[must_use]
    pub fn overlay(&self, snapshot: &RunnerSnapshot) -> DebugOverlay {
        let nearest = nearest_obstacle(snapshot);
        let obstacle_spacing = match snapshot.obstacles.as_slice() {
            [first, second, ..] => Some((second.x - first.x).abs()),
            _ => None,
        };
        DebugOverlay {
            last_action: self.last_action,
            speed: snapshot.speed,
            elapsed: snapshot.elapsed,
            nearest_distance: nearest.map(|n| n.distance),
            thresholds: self.config.scaled(snapshot.speed),
            obstacle_spacing,
            collision_risk: nearest.map(|n| self.collision_risk(snapshot, &n)),
        }
    }
}

impl Policy for DinoController {
    type Input = RunnerSnapshot;

    fn scores(&mut self, input: &RunnerSnapshot) -> Result<[f32; 3], InvalidStateShape> {
        Ok(one_hot(self.decide(input).index()))
    }
}

/// Closest obstacle strictly ahead of the agent; the oldest one wins a tie.
#[must_use]
pub fn nearest_obstacle(snapshot: &RunnerSnapshot) -> Option<NearestObstacle> {
    let agent_x = snapshot.agent.x;
    snapshot
        .obstacles
        .iter()
        .filter(|obstacle| obstacle.x > agent_x)
        .map(|obstacle| NearestObstacle {
            obstacle: *obstacle,
            distance: obstacle.x - agent_x,
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
