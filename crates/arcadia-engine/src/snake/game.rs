use std::collections::VecDeque;

use rand::{Rng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{GameSeed, SnakeSetupError};

use super::{Direction, Point, SnakeConfig, Turn};

/// Reward for eating food.
pub const FOOD_REWARD: i32 = 10;
/// Reward for a terminal collision or stall.
pub const DEATH_REWARD: i32 = -10;

/// Why a snake game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum GameOverCause {
    #[display("hit the wall")]
    Wall,
    #[display("ran into itself")]
    SelfCollision,
    #[display("stalled")]
    Stalled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum SnakeStatus {
    Running,
    GameOver(GameOverCause),
    /// The snake covers every cell, so no food can be placed.
    BoardFull,
}

impl SnakeStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}

/// Result of a single [`SnakeGame::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeStep {
    pub reward: i32,
    pub status: SnakeStatus,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: SnakeConfig,
    /// Occupied cells, head first.
    body: VecDeque<Point>,
    direction: Direction,
    food: Point,
    score: u32,
    frame: u64,
    status: SnakeStatus,
    rng: Pcg32,
}

impl SnakeGame {
    /// Starts a game with a three-cell snake in the middle of the board heading
    /// right, and food at a random free cell.
    pub fn new(config: SnakeConfig, seed: GameSeed) -> Result<Self, SnakeSetupError> {
        config.validate()?;
        let block = config.block_size;
        let head = Point::new(
            config.width / (2 * block) * block,
            config.height / (2 * block) * block,
        );
        let body = [0, 1, 2].map(|i| Point::new(head.x - i * block, head.y));

        let mut game = Self {
            body: VecDeque::from(body),
            direction: Direction::Right,
            food: head,
            score: 0,
            frame: 0,
            status: SnakeStatus::Running,
            rng: seed.rng(),
            config,
        };
        game.validate_body()?;
        if !game.place_food() {
            return Err(SnakeSetupError::BoardTooSmall);
        }
        Ok(game)
    }

    /// Starts a game from an explicit position.
    ///
    /// `body` lists the occupied cells head first. The seed only drives food
    /// placement after the first capture.
    pub fn from_parts(
        config: SnakeConfig,
        body: impl IntoIterator<Item = Point>,
        direction: Direction,
        food: Point,
        seed: GameSeed,
    ) -> Result<Self, SnakeSetupError> {
        config.validate()?;
        let game = Self {
            config,
            body: body.into_iter().collect(),
            direction,
            food,
            score: 0,
            frame: 0,
            status: SnakeStatus::Running,
            rng: seed.rng(),
        };
        game.validate_body()?;
        if !game.is_valid_cell(food) || game.body.contains(&food) {
            return Err(SnakeSetupError::InvalidFood {
                x: food.x,
                y: food.y,
            });
        }
        Ok(game)
    }

    fn validate_body(&self) -> Result<(), SnakeSetupError> {
        if self.body.is_empty() {
            return Err(SnakeSetupError::EmptyBody);
        }
        for (i, &Point { x, y }) in self.body.iter().enumerate() {
            if self.is_out_of_bounds(Point::new(x, y)) {
                return Err(SnakeSetupError::OutOfBounds { x, y });
            }
            if x % self.config.block_size != 0 || y % self.config.block_size != 0 {
                return Err(SnakeSetupError::Unaligned { x, y });
            }
            if self.body.iter().take(i).any(|p| *p == Point::new(x, y)) {
                return Err(SnakeSetupError::OverlappingBody { x, y });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    #[must_use]
    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Point> {
        self.body.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn food(&self) -> Point {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    #[must_use]
    pub fn is_out_of_bounds(&self, pt: Point) -> bool {
        let block = self.config.block_size;
        pt.x < 0 || pt.y < 0 || pt.x > self.config.width - block || pt.y > self.config.height - block
    }

    fn is_valid_cell(&self, pt: Point) -> bool {
        let block = self.config.block_size;
        !self.is_out_of_bounds(pt) && pt.x % block == 0 && pt.y % block == 0
    }

    /// Returns `true` if a head at `pt` would end the game: `pt` is off the board
    /// or on a body cell other than the head.
    #[must_use]
    pub fn is_collision(&self, pt: Point) -> bool {
        self.is_out_of_bounds(pt) || self.body.iter().skip(1).any(|p| *p == pt)
    }

    /// Advances the game by one tick.
    ///
    /// The tail is popped only when no food was eaten, after collisions have been
    /// checked, so moving into the cell the tail is leaving is still a collision.
    /// A finished game ignores further steps.
    pub fn step(&mut self, turn: Turn) -> SnakeStep {
        if self.status.is_terminal() {
            return SnakeStep {
                reward: 0,
                status: self.status,
            };
        }

        self.frame += 1;
        self.direction = self.direction.turned(turn);
        let head = self.head().moved(self.direction, self.config.block_size);
        self.body.push_front(head);

        let stall_limit = u64::from(self.config.stall_factor) * self.body.len() as u64;
        let cause = if self.is_out_of_bounds(head) {
            Some(GameOverCause::Wall)
        } else if self.body.iter().skip(1).any(|p| *p == head) {
            Some(GameOverCause::SelfCollision)
        } else if self.frame > stall_limit {
            Some(GameOverCause::Stalled)
        } else {
            None
        };
        if let Some(cause) = cause {
            self.status = SnakeStatus::GameOver(cause);
            return SnakeStep {
                reward: DEATH_REWARD,
                status: self.status,
            };
        }

        if head == self.food {
            self.score += 1;
            if !self.place_food() {
                self.status = SnakeStatus::BoardFull;
            }
            return SnakeStep {
                reward: FOOD_REWARD,
                status: self.status,
            };
        }

        self.body.pop_back();
        SnakeStep {
            reward: 0,
            status: self.status,
        }
    }

    /// Moves the food to a uniformly random free cell.
    ///
    /// Returns `false` when every cell is occupied.
    fn place_food(&mut self) -> bool {
        let block = self.config.block_size;
        let (columns, rows) = (self.config.columns(), self.config.rows());

        // Rejection sampling is fast while the board is mostly empty.
        for _ in 0..self.config.cell_count() {
            let candidate = Point::new(
                self.rng.random_range(0..columns) * block,
                self.rng.random_range(0..rows) * block,
            );
            if !self.body.contains(&candidate) {
                self.food = candidate;
                return true;
            }
        }

        let free = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Point::new(col * block, row * block)))
            .filter(|p| !self.body.contains(p))
            .collect::<Vec<_>>();
        match free.choose(&mut self.rng) {
            Some(&food) => {
                self.food = food;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;

    fn new_game(seed: u128) -> SnakeGame {
        SnakeGame::new(SnakeConfig::default(), GameSeed::from_u128(seed)).unwrap()
    }

    fn small_config(width: i32, height: i32) -> SnakeConfig {
        SnakeConfig {
            width,
            height,
            ..SnakeConfig::default()
        }
    }

    #[test]
    fn test_initial_layout() {
        let game = new_game(0);
        let body: Vec<_> = game.body().copied().collect();
        assert_eq!(
            body,
            [Point::new(480, 360), Point::new(420, 360), Point::new(360, 360)]
        );
        assert_eq!(game.direction(), Direction::Right);
        assert!(!game.body().any(|p| *p == game.food()));
        assert_eq!(game.frame(), 0);
    }

    #[test]
    fn test_right_turn_moves_head_down() {
        let mut game = new_game(1);
        let step = game.step(Turn::Right);
        assert!(step.status.is_running());
        assert_eq!(game.direction(), Direction::Down);
        assert_eq!(game.head(), Point::new(480, 420));
    }

    #[test]
    fn test_straight_line_hits_wall() {
        let mut game = new_game(2);
        for _ in 0..7 {
            assert!(game.step(Turn::Straight).status.is_running());
        }
        assert_eq!(game.head(), Point::new(900, 360));
        let step = game.step(Turn::Straight);
        assert_eq!(step.status, SnakeStatus::GameOver(GameOverCause::Wall));
        assert_eq!(step.reward, DEATH_REWARD);

        let after = game.step(Turn::Left);
        assert_eq!(after.reward, 0);
        assert_eq!(game.frame(), 8);
    }

    #[test]
    fn test_turning_into_body_is_self_collision() {
        let body = (0..5).rev().map(|i| Point::new(i * 60, 240));
        let mut game = SnakeGame::from_parts(
            SnakeConfig::default(),
            body,
            Direction::Right,
            Point::new(900, 720),
            GameSeed::from_u128(0),
        )
        .unwrap();
        assert!(game.step(Turn::Right).status.is_running());
        assert!(game.step(Turn::Right).status.is_running());
        let step = game.step(Turn::Right);
        assert_eq!(step.status, SnakeStatus::GameOver(GameOverCause::SelfCollision));
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut game = SnakeGame::from_parts(
            SnakeConfig::default(),
            [Point::new(120, 0), Point::new(60, 0), Point::new(0, 0)],
            Direction::Right,
            Point::new(180, 0),
            GameSeed::from_u128(3),
        )
        .unwrap();
        let step = game.step(Turn::Straight);
        assert_eq!(step.reward, FOOD_REWARD);
        assert_eq!(game.score(), 1);
        assert_eq!(game.len(), 4);
        assert!(!game.body().any(|p| *p == game.food()));

        let step = game.step(Turn::Right);
        assert_eq!(step.reward, 0);
        assert_eq!(game.len(), 4);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let config = small_config(240, 240);
        for seed in 0..50 {
            let mut game = SnakeGame::new(config.clone(), GameSeed::from_u128(seed)).unwrap();
            let mut turns = GameSeed::from_u128(seed + 1000).rng();
            while game.status().is_running() {
                let turn = Turn::ALL[turns.random_range(0..3)];
                game.step(turn);
                if game.status().is_running() {
                    assert!(!game.body().any(|p| *p == game.food()), "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn test_looping_snake_stalls() {
        let mut game = SnakeGame::from_parts(
            small_config(180, 180),
            [Point::new(0, 0)],
            Direction::Right,
            Point::new(120, 120),
            GameSeed::from_u128(0),
        )
        .unwrap();
        assert!(game.step(Turn::Straight).status.is_running());
        let mut last = None;
        for _ in 0..300 {
            let step = game.step(Turn::Right);
            if step.status.is_terminal() {
                last = Some(step);
                break;
            }
        }
        // A one-cell snake counts the new head as well, so the limit is 2 × 100.
        let last = last.unwrap();
        assert_eq!(last.status, SnakeStatus::GameOver(GameOverCause::Stalled));
        assert_eq!(last.reward, DEATH_REWARD);
        assert_eq!(game.frame(), 201);
    }

    #[test]
    fn test_filling_the_board_is_terminal_win() {
        let mut game = SnakeGame::from_parts(
            small_config(120, 60),
            [Point::new(0, 0)],
            Direction::Right,
            Point::new(60, 0),
            GameSeed::from_u128(0),
        )
        .unwrap();
        let step = game.step(Turn::Straight);
        assert_eq!(step.status, SnakeStatus::BoardFull);
        assert_eq!(step.reward, FOOD_REWARD);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_invalid_setups_are_rejected() {
        let config = SnakeConfig::default();
        let seed = GameSeed::from_u128(0);
        let food = Point::new(600, 600);
        assert_eq!(
            SnakeGame::from_parts(config.clone(), [], Direction::Right, food, seed).unwrap_err(),
            SnakeSetupError::EmptyBody
        );
        assert_eq!(
            SnakeGame::from_parts(config.clone(), [Point::new(-60, 0)], Direction::Right, food, seed)
                .unwrap_err(),
            SnakeSetupError::OutOfBounds { x: -60, y: 0 }
        );
        assert_eq!(
            SnakeGame::from_parts(config.clone(), [Point::new(30, 0)], Direction::Right, food, seed)
                .unwrap_err(),
            SnakeSetupError::Unaligned { x: 30, y: 0 }
        );
        assert_eq!(
            SnakeGame::from_parts(
                config.clone(),
                [Point::new(0, 0), Point::new(0, 0)],
                Direction::Right,
                food,
                seed
            )
            .unwrap_err(),
            SnakeSetupError::OverlappingBody { x: 0, y: 0 }
        );
        assert_eq!(
            SnakeGame::from_parts(config, [food], Direction::Right, food, seed).unwrap_err(),
            SnakeSetupError::InvalidFood { x: 600, y: 600 }
        );
    }

    #[test]
    fn test_board_too_small_for_start_layout() {
        let err = SnakeGame::new(small_config(60, 60), GameSeed::from_u128(0)).unwrap_err();
        assert!(matches!(err, SnakeSetupError::OutOfBounds { .. }));
    }

    #[test]
    fn test_zero_block_size_is_an_error() {
        let config = SnakeConfig {
            block_size: 0,
            ..SnakeConfig::default()
        };
        let seed = GameSeed::from_u128(0);
        assert!(matches!(
            SnakeGame::new(config.clone(), seed),
            Err(SnakeSetupError::InvalidBoard { block_size: 0, .. })
        ));
        assert!(matches!(
            SnakeGame::from_parts(config, [Point::new(0, 0)], Direction::Right, Point::new(0, 0), seed),
            Err(SnakeSetupError::InvalidBoard { block_size: 0, .. })
        ));
    }

    #[test]
    fn test_same_seed_same_food_sequence() {
        let mut a = new_game(9);
        let mut b = new_game(9);
        assert_eq!(a.food(), b.food());
        for turn in [Turn::Straight, Turn::Right, Turn::Right, Turn::Left] {
            assert_eq!(a.step(turn), b.step(turn));
            assert_eq!(a.food(), b.food());
        }
    }
}
