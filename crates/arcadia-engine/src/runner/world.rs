use std::collections::VecDeque;

use crate::GameSeed;

use super::{
    Agent, AgentPose, DifficultyController, ObstacleDescriptor, ObstacleId, RunnerAction,
    RunnerConfig, RunnerSnapshot,
};

/// Outcome of a single [`RunnerWorld::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunnerStep {
    /// Obstacles that left the world this tick.
    pub cleared: u32,
    pub crashed: bool,
}

/// The endless-runner world: one agent, a queue of obstacles, a difficulty schedule.
#[derive(Debug, Clone)]
pub struct RunnerWorld {
    config: RunnerConfig,
    agent: Agent,
    obstacles: VecDeque<ObstacleDescriptor>,
    difficulty: DifficultyController,
    next_obstacle_id: u64,
    tick: u64,
    score: u32,
    crashed: bool,
}

impl RunnerWorld {
    #[must_use]
    pub fn new(config: RunnerConfig, seed: GameSeed) -> Self {
        let agent = Agent::new(&config);
        let difficulty = DifficultyController::new(config.difficulty.clone(), seed);
        Self {
            config,
            agent,
            obstacles: VecDeque::new(),
            difficulty,
            next_obstacle_id: 0,
            tick: 0,
            score: 0,
            crashed: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    #[must_use]
    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn obstacles(&self) -> impl ExactSizeIterator<Item = &ObstacleDescriptor> {
        self.obstacles.iter()
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Elapsed game time in seconds.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.tick as f32 / self.config.ticks_per_second
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.difficulty.speed(self.elapsed())
    }

    #[must_use]
    pub fn snapshot(&self) -> RunnerSnapshot {
        let rect = self.agent.rect();
        RunnerSnapshot {
            agent: AgentPose {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                velocity: self.agent.velocity(),
                mode: self.agent.mode(),
            },
            obstacles: self.obstacles.iter().copied().collect(),
            score: self.score,
            tick: self.tick,
            elapsed: self.elapsed(),
            speed: self.speed(),
            ground_y: self.config.ground_y(),
        }
    }

    /// Advances the world by one tick.
    ///
    /// Once the agent has crashed the world is frozen and every further call
    /// reports the crash without changing state.
    pub fn step(&mut self, action: RunnerAction) -> RunnerStep {
        if self.crashed {
            return RunnerStep {
                cleared: 0,
                crashed: true,
            };
        }

        let elapsed = self.elapsed();
        let speed = self.difficulty.speed(elapsed);

        self.agent.apply(action);
        self.agent.update();

        if let Some(spawn_distance) = self.difficulty.try_spawn(
            self.obstacles.back(),
            self.config.world_width,
            elapsed,
        ) {
            self.spawn_obstacle(spawn_distance);
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }

        let mut cleared = 0;
        while self.obstacles.front().is_some_and(ObstacleDescriptor::has_exited) {
            self.obstacles.pop_front();
            cleared += 1;
        }
        self.score += cleared;

        let agent_rect = self.agent.rect();
        self.crashed = self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.rect().intersects(&agent_rect));
        self.tick += 1;

        RunnerStep {
            cleared,
            crashed: self.crashed,
        }
    }

    fn spawn_obstacle(&mut self, spawn_distance: f32) {
        let id = ObstacleId(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        self.obstacles.push_back(ObstacleDescriptor {
            id,
            x: self.config.world_width,
            y: self.config.ground_y() - self.config.obstacle_height,
            width: self.config.obstacle_width,
            height: self.config.obstacle_height,
            spawn_distance,
        });
    }
}
