use arcadia_engine::snake::{Direction, Turn};

use crate::{
    policy::{InvalidStateShape, Policy},
    snake_features::SnakeFeatureSet,
};

/// Hand-coded snake policy over the full feature vector.
///
/// Turns into danger score -1, turns whose new heading points toward the food
/// score 1, everything else 0. Ties keep going straight.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyFoodPolicy;

const HEADINGS: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

impl Policy for GreedyFoodPolicy {
    type Input = [f32];

    fn scores(&mut self, input: &[f32]) -> Result<[f32; 3], InvalidStateShape> {
        InvalidStateShape::check(input, SnakeFeatureSet::Full.dimension())?;
        let danger = &input[0..3];
        let heading = HEADINGS
            .iter()
            .zip(&input[3..7])
            .find_map(|(d, flag)| (*flag > 0.5).then_some(*d))
            .unwrap_or_default();
        let food = &input[7..11];

        Ok(Turn::ALL.map(|turn| {
            if danger[turn.index()] > 0.5 {
                return -1.0;
            }
            let next = heading.turned(turn);
            let toward_food = HEADINGS
                .iter()
                .position(|d| *d == next)
                .is_some_and(|i| food[i] > 0.5);
            if toward_food { 1.0 } else { 0.0 }
        }))
    }
}
