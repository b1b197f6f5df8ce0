//! Headless runner sessions.

use arcadia_engine::runner::{AgentMode, RunnerAction, RunnerSnapshot, RunnerWorld};
use serde::{Deserialize, Serialize};

use crate::policy::{InvalidStateShape, Policy, arg_max};

/// Summary of one runner session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerSessionStats {
    pub ticks: u64,
    pub score: u32,
    /// Game time survived, in seconds.
    pub elapsed: f32,
    pub final_speed: f32,
    /// Jumps actually started by the agent.
    pub jumps: u32,
    /// Ticks on which the agent went from standing to ducking.
    pub ducks: u32,
    pub crashed: bool,
}

/// Lets `policy` play `world` until the agent crashes or `tick_limit` ticks
/// have run.
pub fn play_runner_session<P>(
    mut world: RunnerWorld,
    policy: &mut P,
    tick_limit: u64,
) -> Result<RunnerSessionStats, InvalidStateShape>
where
    P: Policy<Input = RunnerSnapshot> + ?Sized,
{
    let mut jumps = 0;
    let mut ducks = 0;
    let mut crashed = false;

    while world.tick() < tick_limit {
        let snapshot = world.snapshot();
        let action = RunnerAction::ALL[arg_max(&policy.scores(&snapshot)?)];

        let before = world.agent().mode();
        let step = world.step(action);
        match (before, world.agent().mode()) {
            (AgentMode::Jumping, _) => {}
            (_, AgentMode::Jumping) => jumps += 1,
            (AgentMode::Running, AgentMode::Ducking) => ducks += 1,
            _ => {}
        }

        if step.crashed {
            crashed = true;
            break;
        }
    }

    let stats = RunnerSessionStats {
        ticks: world.tick(),
        score: world.score(),
        elapsed: world.elapsed(),
        final_speed: world.speed(),
        jumps,
        ducks,
        crashed,
    };
    tracing::debug!(?stats, "runner session finished");
    Ok(stats)
}
