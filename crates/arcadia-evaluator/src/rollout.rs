//! Snake rollouts and fitness scoring.
//!
//! A rollout plays one policy on a fresh [`SnakeGame`] until the game reports a
//! terminal state. Fitness is accumulated tick by tick:
//!
//! ```text
//! fitness += reward           (+10 food, -10 death, 0 otherwise)
//! fitness += 0.1              (alive bonus, every tick including the last)
//! fitness += 50   if reward == +10
//! fitness += 1    if |head - food|₁ < previous |head - food|₁
//! ```
//!
//! The Manhattan distance is measured after every step against the food's
//! current cell, so right after a capture the baseline becomes the distance to
//! the relocated food.

use arcadia_engine::{
    GameSeed, SnakeSetupError,
    snake::{FOOD_REWARD, SnakeConfig, SnakeGame, SnakeStatus, Turn},
};
use serde::{Deserialize, Serialize};

use crate::{
    policy::{InvalidStateShape, Policy, arg_max},
    snake_features::SnakeFeatureSet,
};

const ALIVE_BONUS: f32 = 0.1;
const FOOD_BONUS: f32 = 50.0;
const APPROACH_BONUS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenomeId(pub u64);

/// Final score of one rollout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    genome_id: GenomeId,
    fitness: f32,
    score: u32,
    ticks: u64,
    outcome: SnakeStatus,
}

impl FitnessRecord {
    #[must_use]
    pub fn genome_id(&self) -> GenomeId {
        self.genome_id
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Food captured during the rollout.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn outcome(&self) -> SnakeStatus {
        self.outcome
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RolloutError {
    #[display("cannot start snake game: {_0}")]
    Setup(SnakeSetupError),
    #[display("policy rejected state: {_0}")]
    Shape(InvalidStateShape),
}

/// Running fitness sum of a rollout in progress.
#[derive(Debug, Clone, Copy)]
struct FitnessAccumulator {
    fitness: f32,
    last_distance: u32,
}

impl FitnessAccumulator {
    fn new(game: &SnakeGame) -> Self {
        Self {
            fitness: 0.0,
            last_distance: game.head().manhattan_distance(game.food()),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn record(&mut self, reward: i32, game: &SnakeGame) {
        self.fitness += reward as f32;
        self.fitness += ALIVE_BONUS;
        if reward == FOOD_REWARD {
            self.fitness += FOOD_BONUS;
        }
        let distance = game.head().manhattan_distance(game.food());
        if distance < self.last_distance {
            self.fitness += APPROACH_BONUS;
        }
        self.last_distance = distance;
    }
}

/// Plays snake policies headlessly and scores them.
#[derive(Debug, Clone)]
pub struct SnakeEvaluator {
    config: SnakeConfig,
    features: SnakeFeatureSet,
}

impl SnakeEvaluator {
    #[must_use]
    pub fn new(config: SnakeConfig, features: SnakeFeatureSet) -> Self {
        Self { config, features }
    }

    #[must_use]
    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    #[must_use]
    pub fn features(&self) -> SnakeFeatureSet {
        self.features
    }

    /// Plays `policy` on a fresh game seeded with `seed`.
    pub fn evaluate<P>(
        &self,
        genome_id: GenomeId,
        policy: &mut P,
        seed: GameSeed,
    ) -> Result<FitnessRecord, RolloutError>
    where
        P: Policy<Input = [f32]> + ?Sized,
    {
        let game = SnakeGame::new(self.config.clone(), seed)?;
        Ok(self.evaluate_game(genome_id, policy, game)?)
    }

    /// Plays `policy` on an already prepared game until it ends.
    pub fn evaluate_game<P>(
        &self,
        genome_id: GenomeId,
        policy: &mut P,
        mut game: SnakeGame,
    ) -> Result<FitnessRecord, InvalidStateShape>
    where
        P: Policy<Input = [f32]> + ?Sized,
    {
        let mut accumulator = FitnessAccumulator::new(&game);
        let mut ticks = 0;
        let outcome = loop {
            let state = self.features.extract(&game);
            let turn = Turn::ALL[arg_max(&policy.scores(&state)?)];
            let step = game.step(turn);
            ticks += 1;
            accumulator.record(step.reward, &game);
            if step.status.is_terminal() {
                break step.status;
            }
        };

        let record = FitnessRecord {
            genome_id,
            fitness: accumulator.fitness,
            score: game.score(),
            ticks,
            outcome,
        };
        tracing::debug!(
            genome = genome_id.0,
            score = record.score,
            fitness = record.fitness,
            ticks,
            "rollout finished"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use arcadia_engine::snake::{Direction, GameOverCause, Point};

    use super::*;
    use crate::{greedy::GreedyFoodPolicy, policy::one_hot};

    /// Replays a fixed cycle of turns regardless of the state.
    struct Scripted {
        turns: Vec<Turn>,
        next: usize,
    }

    impl Scripted {
        fn new(turns: &[Turn]) -> Self {
            Self {
                turns: turns.to_vec(),
                next: 0,
            }
        }
    }

    impl Policy for Scripted {
        type Input = [f32];

        fn scores(&mut self, _input: &[f32]) -> Result<[f32; 3], InvalidStateShape> {
            let turn = self.turns[self.next % self.turns.len()];
            self.next += 1;
            Ok(one_hot(turn.index()))
        }
    }

    fn evaluator() -> SnakeEvaluator {
        SnakeEvaluator::new(SnakeConfig::default(), SnakeFeatureSet::Full)
    }

    #[test]
    fn test_capture_then_loop_until_stall() {
        // A 100 × 100 board, so the relocated food is very unlikely to land on
        // the six-cell loop the script drives the snake around.
        let config = SnakeConfig {
            width: 6000,
            height: 6000,
            ..SnakeConfig::default()
        };
        let game = SnakeGame::from_parts(
            config.clone(),
            [Point::new(480, 360), Point::new(420, 360), Point::new(360, 360)],
            Direction::Right,
            Point::new(480, 420),
            GameSeed::from_u128(17),
        )
        .unwrap();
        let mut policy = Scripted::new(&[Turn::Right, Turn::Right, Turn::Straight]);
        let record = SnakeEvaluator::new(config, SnakeFeatureSet::Full)
            .evaluate_game(GenomeId(1), &mut policy, game)
            .unwrap();
        assert_eq!(record.genome_id(), GenomeId(1));
        assert_eq!(record.score(), 1);
        assert_eq!(
            record.outcome(),
            SnakeStatus::GameOver(GameOverCause::Stalled)
        );
        // Four cells plus the new head: the frame limit is 5 × 100.
        assert_eq!(record.ticks(), 501);

        // 10 food + 50 bonus + 501 × 0.1 alive - 10 death, plus whole approach
        // bonuses earned while circling.
        let base = 10.0 + 50.0 + 50.1 - 10.0;
        let approach = record.fitness() - base;
        assert!(approach > -0.05, "{record:?}");
        assert!((approach - approach.round()).abs() < 0.05, "{record:?}");
    }

    #[test]
    fn test_approach_bonus_only_when_closing_in() {
        let game = SnakeGame::from_parts(
            SnakeConfig::default(),
            [Point::new(480, 360)],
            Direction::Right,
            Point::new(720, 360),
            GameSeed::from_u128(0),
        )
        .unwrap();
        // Distances to the food: 240 -> 180, 240, 180, 240, 300, ... then the wall.
        let mut policy = Scripted::new(&[
            Turn::Straight,
            Turn::Right,
            Turn::Left,
            Turn::Right,
            Turn::Straight,
            Turn::Straight,
            Turn::Straight,
            Turn::Straight,
            Turn::Straight,
        ]);
        let record = evaluator()
            .evaluate_game(GenomeId(3), &mut policy, game)
            .unwrap();
        assert_eq!(record.ticks(), 9);
        assert_eq!(record.score(), 0);
        assert_eq!(
            record.outcome(),
            SnakeStatus::GameOver(GameOverCause::Wall)
        );
        // 9 × 0.1 alive + 2 approach bonuses - 10 death.
        assert!((record.fitness() - (-7.1)).abs() < 1e-4, "{record:?}");
    }

    #[test]
    fn test_board_full_rollout_fitness() {
        let config = SnakeConfig {
            width: 120,
            height: 60,
            ..SnakeConfig::default()
        };
        let game = SnakeGame::from_parts(
            config.clone(),
            [Point::new(0, 0)],
            Direction::Right,
            Point::new(60, 0),
            GameSeed::from_u128(0),
        )
        .unwrap();
        let record = SnakeEvaluator::new(config, SnakeFeatureSet::Full)
            .evaluate_game(GenomeId(0), &mut Scripted::new(&[Turn::Straight]), game)
            .unwrap();
        assert_eq!(record.outcome(), SnakeStatus::BoardFull);
        assert_eq!(record.ticks(), 1);
        assert_eq!(record.score(), 1);
        // 10 food + 0.1 alive + 50 bonus + 1 for closing in on the food.
        assert!((record.fitness() - 61.1).abs() < 1e-4);
    }

    #[test]
    fn test_immediate_wall_hit() {
        let game = SnakeGame::from_parts(
            SnakeConfig::default(),
            [Point::new(900, 0)],
            Direction::Right,
            Point::new(0, 720),
            GameSeed::from_u128(0),
        )
        .unwrap();
        let record = evaluator()
            .evaluate_game(GenomeId(2), &mut Scripted::new(&[Turn::Straight]), game)
            .unwrap();
        assert_eq!(
            record.outcome(),
            SnakeStatus::GameOver(GameOverCause::Wall)
        );
        assert!((record.fitness() - (-10.0 + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_greedy_policy_finds_food() {
        let evaluator = evaluator();
        for seed in 0..3 {
            let record = evaluator
                .evaluate(GenomeId(seed), &mut GreedyFoodPolicy, GameSeed::from_u128(seed.into()))
                .unwrap();
            assert!(record.score() >= 1, "seed {seed}: {record:?}");
            assert!(record.fitness() > 60.0);
        }
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let evaluator = SnakeEvaluator::new(SnakeConfig::default(), SnakeFeatureSet::Compact);
        let err = evaluator
            .evaluate(GenomeId(0), &mut GreedyFoodPolicy, GameSeed::from_u128(0))
            .unwrap_err();
        assert!(matches!(
            err,
            RolloutError::Shape(InvalidStateShape {
                expected: 11,
                actual: 7
            })
        ));
    }

    #[test]
    fn test_same_seed_same_record() {
        let evaluator = evaluator();
        let a = evaluator
            .evaluate(GenomeId(0), &mut GreedyFoodPolicy, GameSeed::from_u128(5))
            .unwrap();
        let b = evaluator
            .evaluate(GenomeId(0), &mut GreedyFoodPolicy, GameSeed::from_u128(5))
            .unwrap();
        assert_eq!(a, b);
    }
}
