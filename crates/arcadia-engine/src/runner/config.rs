use serde::{Deserialize, Serialize};

use crate::InvalidRunnerConfig;

use super::JumpKinematics;

/// Geometry and timing of the runner world.
///
/// Defaults reproduce the classic 800×400 layout: ground 20 px above the bottom
/// edge, the agent fixed at x = 80 and hurdles spawning at the right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Distance between the ground line and the bottom edge of the world.
    pub ground_margin: f32,
    /// Simulation ticks per second of game time.
    pub ticks_per_second: f32,
    pub agent_x: f32,
    pub agent_width: f32,
    pub agent_height: f32,
    /// Vertical offset applied while ducking.
    pub duck_offset: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub jump: JumpKinematics,
    pub difficulty: DifficultyConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 400.0,
            ground_margin: 20.0,
            ticks_per_second: 60.0,
            agent_x: 80.0,
            agent_width: 73.0,
            agent_height: 106.0,
            duck_offset: 20.0,
            obstacle_width: 48.0,
            obstacle_height: 149.0,
            jump: JumpKinematics::default(),
            difficulty: DifficultyConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Y coordinate of the ground line.
    #[must_use]
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.ground_margin
    }

    /// Rejects settings the world cannot be advanced with.
    pub fn validate(&self) -> Result<(), InvalidRunnerConfig> {
        let fail = |reason| Err(InvalidRunnerConfig { reason });
        if !(self.world_width > 0.0 && self.world_width.is_finite()) {
            return fail("world width must be finite and positive");
        }
        if !(self.ticks_per_second > 0.0 && self.ticks_per_second.is_finite()) {
            return fail("ticks per second must be finite and positive");
        }
        let jump = &self.jump;
        if !(jump.initial_velocity > 0.0 && jump.deceleration > 0.0) {
            return fail("jump velocity and deceleration must be positive");
        }
        if !(jump.initial_velocity.is_finite() && jump.deceleration.is_finite()) {
            return fail("jump kinematics must be finite");
        }
        self.difficulty.validate()
    }
}

/// Parameters of the speed curve and obstacle spacing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Speed gained per second of elapsed time.
    pub ramp_rate: f32,
    /// Global floor for any spawn distance.
    pub min_distance: f32,
    /// Spacing assumed for an obstacle that carries no spawn hint.
    pub preferred_distance: f32,
    /// Maximum absolute jitter added to a drawn distance.
    pub jitter: i32,
    /// Seconds over which pattern weights drift from `initial_weights` to `final_weights`.
    pub weight_window: f32,
    /// Lower bound of every pattern weight after drift.
    pub weight_floor: f32,
    /// Weights of `[close, normal, far, mixed]` at time zero.
    pub initial_weights: [f32; 4],
    /// Weights of `[close, normal, far, mixed]` once the window has elapsed.
    pub final_weights: [f32; 4],
    /// Probability that an eligible spawn actually happens on a tick.
    pub spawn_chance: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_speed: 7.0,
            max_speed: 15.0,
            ramp_rate: 0.1,
            min_distance: 180.0,
            preferred_distance: 300.0,
            jitter: 20,
            weight_window: 120.0,
            weight_floor: 0.05,
            initial_weights: [0.2, 0.5, 0.2, 0.1],
            final_weights: [0.5, 0.4, 0.05, 0.05],
            spawn_chance: 2.0 / 3.0,
        }
    }
}

impl DifficultyConfig {
    /// Rejects settings the spacing schedule cannot draw from.
    pub fn validate(&self) -> Result<(), InvalidRunnerConfig> {
        let fail = |reason| Err(InvalidRunnerConfig { reason });
        let speeds = [self.initial_speed, self.max_speed, self.ramp_rate];
        if !speeds.iter().all(|v| *v >= 0.0 && v.is_finite()) {
            return fail("speeds and ramp rate must be finite and non-negative");
        }
        if !(self.min_distance.is_finite() && self.preferred_distance.is_finite()) {
            return fail("spawn distances must be finite");
        }
        if self.jitter < 0 {
            return fail("jitter must not be negative");
        }
        if !(self.weight_window > 0.0 && self.weight_window.is_finite()) {
            return fail("weight window must be finite and positive");
        }
        if !(self.weight_floor > 0.0 && self.weight_floor.is_finite()) {
            return fail("weight floor must be finite and positive");
        }
        let mut weights = self.initial_weights.iter().chain(&self.final_weights);
        if !weights.all(|w| *w >= 0.0 && w.is_finite()) {
            return fail("pattern weights must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return fail("spawn chance must be within [0, 1]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{ "world_width": 1200.0, "difficulty": { "max_speed": 20.0 } }"#)
                .unwrap();
        assert_eq!(config.world_width, 1200.0);
        assert_eq!(config.ground_y(), 380.0);
        assert_eq!(config.difficulty.max_speed, 20.0);
        assert_eq!(config.difficulty.initial_speed, 7.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        RunnerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let difficulty = |d: DifficultyConfig| RunnerConfig {
            difficulty: d,
            ..RunnerConfig::default()
        };
        let bad = [
            RunnerConfig {
                ticks_per_second: 0.0,
                ..RunnerConfig::default()
            },
            RunnerConfig {
                jump: JumpKinematics {
                    deceleration: 0.0,
                    ..JumpKinematics::default()
                },
                ..RunnerConfig::default()
            },
            difficulty(DifficultyConfig {
                spawn_chance: 1.5,
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                spawn_chance: f64::NAN,
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                jitter: -1,
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                weight_floor: 0.0,
                initial_weights: [0.0; 4],
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                final_weights: [0.5, f32::INFINITY, 0.0, 0.0],
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                weight_window: 0.0,
                ..DifficultyConfig::default()
            }),
            difficulty(DifficultyConfig {
                max_speed: f32::NAN,
                ..DifficultyConfig::default()
            }),
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_edge_values_are_accepted() {
        let config = DifficultyConfig {
            jitter: 0,
            spawn_chance: 1.0,
            initial_weights: [0.0, 1.0, 0.0, 0.0],
            ..DifficultyConfig::default()
        };
        config.validate().unwrap();
    }
}
