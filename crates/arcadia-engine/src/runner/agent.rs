use serde::{Deserialize, Serialize};

use crate::Rect;

use super::RunnerConfig;

/// Discrete action a runner policy can request for one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunnerAction {
    #[default]
    Run,
    Jump,
    Duck,
}

impl RunnerAction {
    /// All actions in score-vector order.
    pub const ALL: [RunnerAction; 3] = [RunnerAction::Run, RunnerAction::Jump, RunnerAction::Duck];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            RunnerAction::Run => 0,
            RunnerAction::Jump => 1,
            RunnerAction::Duck => 2,
        }
    }
}

/// Posture of the runner agent.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum AgentMode {
    #[default]
    Running,
    Jumping,
    Ducking,
}

/// Discrete jump arc shared by the simulator and by collision prediction.
///
/// Each airborne tick the agent rises by `velocity * scale`, then the velocity
/// drops by `deceleration`. The agent lands once the velocity reaches
/// `-initial_velocity`, so with the defaults (8.5, 0.5, ×4) a jump lasts
/// `2 × 8.5 / 0.5 = 34` ticks: 17 rising and 17 falling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpKinematics {
    pub initial_velocity: f32,
    pub deceleration: f32,
    pub scale: f32,
}

impl Default for JumpKinematics {
    fn default() -> Self {
        Self {
            initial_velocity: 8.5,
            deceleration: 0.5,
            scale: 4.0,
        }
    }
}

impl JumpKinematics {
    /// Returns the number of ticks a full jump stays airborne.
    #[must_use]
    pub fn airborne_ticks(&self) -> u32 {
        self.ticks_until_landing(self.initial_velocity)
    }

    /// Returns the number of ticks left before landing for a jump currently
    /// moving at `velocity`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn ticks_until_landing(&self, velocity: f32) -> u32 {
        ((velocity + self.initial_velocity) / self.deceleration)
            .ceil()
            .max(0.0) as u32
    }

    /// Upward displacement accumulated over `ticks` ticks starting at `velocity`.
    ///
    /// For whole tick counts this equals the tick-by-tick integration exactly;
    /// fractional counts interpolate the same closed form.
    #[must_use]
    pub fn displacement(&self, velocity: f32, ticks: f32) -> f32 {
        self.scale * (ticks * velocity - self.deceleration * ticks * (ticks - 1.0) / 2.0)
    }
}

/// The runner agent's body, owned by the world and mutated only through
/// [`Agent::apply`] and [`Agent::update`].
#[derive(Debug, Clone)]
pub struct Agent {
    x: f32,
    y: f32,
    baseline_y: f32,
    width: f32,
    height: f32,
    duck_offset: f32,
    velocity: f32,
    mode: AgentMode,
    kinematics: JumpKinematics,
}

impl Agent {
    #[must_use]
    pub fn new(config: &RunnerConfig) -> Self {
        let baseline_y = config.ground_y() - config.agent_height;
        Self {
            x: config.agent_x,
            y: baseline_y,
            baseline_y,
            width: config.agent_width,
            height: config.agent_height,
            duck_offset: config.duck_offset,
            velocity: config.jump.initial_velocity,
            mode: AgentMode::Running,
            kinematics: config.jump,
        }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn baseline_y(&self) -> f32 {
        self.baseline_y
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Applies a requested action.
    ///
    /// A jump in progress can be neither restarted nor turned into a duck; any
    /// request other than a duck stands the agent back up.
    pub fn apply(&mut self, action: RunnerAction) {
        if self.mode.is_jumping() {
            return;
        }
        self.mode = match action {
            RunnerAction::Jump => AgentMode::Jumping,
            RunnerAction::Duck => AgentMode::Ducking,
            RunnerAction::Run => AgentMode::Running,
        };
    }

    /// Advances the agent's pose by one tick.
    pub fn update(&mut self) {
        match self.mode {
            AgentMode::Jumping => {
                self.y -= self.velocity * self.kinematics.scale;
                self.velocity -= self.kinematics.deceleration;
                if self.velocity <= -self.kinematics.initial_velocity {
                    self.mode = AgentMode::Running;
                    self.velocity = self.kinematics.initial_velocity;
                    self.y = self.baseline_y;
                }
            }
            AgentMode::Ducking => self.y = self.baseline_y + self.duck_offset,
            AgentMode::Running => self.y = self.baseline_y,
        }
    }
}
