//! Snake state extractors.
//!
//! Both extractors describe the board relative to the head using 0/1 values:
//!
//! | Index | [`Full`](SnakeFeatureSet::Full) (11) | [`Compact`](SnakeFeatureSet::Compact) (7) |
//! |------:|--------------------------------------|-------------------------------------------|
//! | 0     | danger straight                      | danger straight                           |
//! | 1     | danger right                         | danger right                              |
//! | 2     | danger left                          | danger left                               |
//! | 3     | heading left                         | food up                                   |
//! | 4     | heading right                        | food down                                 |
//! | 5     | heading up                           | food left                                 |
//! | 6     | heading down                         | food right                                |
//! | 7     | food left                            |                                           |
//! | 8     | food right                           |                                           |
//! | 9     | food up                              |                                           |
//! | 10    | food down                            |                                           |
//!
//! "Danger" means moving one cell after that relative turn would end the game.

use arcadia_engine::snake::{Direction, SnakeGame, Turn};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

pub const MAX_FEATURES: usize = 11;

pub type FeatureVector = ArrayVec<f32, MAX_FEATURES>;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
pub enum SnakeFeatureSet {
    /// Danger, heading and food direction: 11 values.
    #[default]
    Full,
    /// Danger and food direction only: 7 values.
    Compact,
}

impl SnakeFeatureSet {
    /// Number of values produced by [`Self::extract`].
    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            SnakeFeatureSet::Full => 11,
            SnakeFeatureSet::Compact => 7,
        }
    }

    #[must_use]
    pub fn extract(self, game: &SnakeGame) -> FeatureVector {
        let head = game.head();
        let food = game.food();
        let heading = game.direction();
        let block = game.config().block_size;

        let danger = Turn::ALL.map(|turn| {
            let next = head.moved(heading.turned(turn), block);
            flag(game.is_collision(next))
        });
        let food_left = flag(food.x < head.x);
        let food_right = flag(food.x > head.x);
        let food_up = flag(food.y < head.y);
        let food_down = flag(food.y > head.y);

        let mut features = FeatureVector::new();
        features.extend(danger);
        match self {
            SnakeFeatureSet::Full => {
                features.extend(
                    [
                        Direction::Left,
                        Direction::Right,
                        Direction::Up,
                        Direction::Down,
                    ]
                    .map(|d| flag(heading == d)),
                );
                features.extend([food_left, food_right, food_up, food_down]);
            }
            SnakeFeatureSet::Compact => {
                features.extend([food_up, food_down, food_left, food_right]);
            }
        }
        features
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
