//! Speed curve and obstacle spacing schedule for the runner.
//!
//! Spacing is drawn in two stages. A [`SpacingPattern`] bucket is chosen from a
//! weight table that drifts toward tighter spacing as the game goes on, then a
//! distance is drawn uniformly inside the bucket and jittered.
//!
//! The weight table is corrected against streaks before every draw: three close
//! buckets in a row suppress `close`, two far buckets in a row suppress `far`.
//! The correction only affects that single draw.

use rand::{
    Rng as _,
    distr::{Distribution as _, weighted::WeightedIndex},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::GameSeed;

use super::{DifficultyConfig, ObstacleDescriptor};

const CLOSE_STREAK_LIMIT: u32 = 3;
const FAR_STREAK_LIMIT: u32 = 2;

/// Spacing bucket for the gap in front of a new obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpacingPattern {
    Close,
    Normal,
    Far,
    Mixed,
}

impl SpacingPattern {
    pub const ALL: [SpacingPattern; 4] = [
        SpacingPattern::Close,
        SpacingPattern::Normal,
        SpacingPattern::Far,
        SpacingPattern::Mixed,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SpacingPattern::Close => 0,
            SpacingPattern::Normal => 1,
            SpacingPattern::Far => 2,
            SpacingPattern::Mixed => 3,
        }
    }

    /// Inclusive distance range of the bucket.
    #[must_use]
    pub const fn range(self) -> (i32, i32) {
        match self {
            SpacingPattern::Close => (180, 250),
            SpacingPattern::Normal => (250, 350),
            SpacingPattern::Far => (350, 450),
            SpacingPattern::Mixed => (180, 450),
        }
    }
}

/// Probability table over [`SpacingPattern::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternWeights([f32; 4]);

impl PatternWeights {
    #[must_use]
    pub const fn new(weights: [f32; 4]) -> Self {
        Self(weights)
    }

    #[must_use]
    pub fn get(&self, pattern: SpacingPattern) -> f32 {
        self.0[pattern.index()]
    }

    fn set(&mut self, pattern: SpacingPattern, weight: f32) {
        self.0[pattern.index()] = weight;
    }

    fn add(&mut self, pattern: SpacingPattern, delta: f32) {
        self.0[pattern.index()] += delta;
    }

    #[must_use]
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0
    }

    /// Scales the table so that it sums to 1.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let sum = self.sum();
        if sum > 0.0 {
            for w in &mut self.0 {
                *w /= sum;
            }
        }
        self
    }
}

/// Generates the speed schedule and obstacle spacing consumed by the runner world.
///
/// The drawing methods assume a configuration accepted by
/// [`DifficultyConfig::validate`] and panic otherwise.
#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: DifficultyConfig,
    rng: Pcg32,
    consecutive_close: u32,
    consecutive_far: u32,
    last_distance: f32,
}

impl DifficultyController {
    #[must_use]
    pub fn new(config: DifficultyConfig, seed: GameSeed) -> Self {
        let last_distance = config.preferred_distance;
        Self {
            config,
            rng: seed.rng(),
            consecutive_close: 0,
            consecutive_far: 0,
            last_distance,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    #[must_use]
    pub fn consecutive_close(&self) -> u32 {
        self.consecutive_close
    }

    #[must_use]
    pub fn consecutive_far(&self) -> u32 {
        self.consecutive_far
    }

    /// Distance produced by the most recent draw.
    #[must_use]
    pub fn last_distance(&self) -> f32 {
        self.last_distance
    }

    /// Game speed after `elapsed` seconds: linear ramp saturating at the maximum.
    #[must_use]
    pub fn speed(&self, elapsed: f32) -> f32 {
        let config = &self.config;
        f32::min(
            config.initial_speed + elapsed.max(0.0) * config.ramp_rate,
            config.max_speed,
        )
    }

    /// Pattern weights after time drift and flooring, before streak correction.
    #[must_use]
    pub fn adaptive_weights(&self, elapsed: f32) -> PatternWeights {
        let config = &self.config;
        let factor = (elapsed.max(0.0) / config.weight_window).min(1.0);
        let mut weights = [0.0; 4];
        for (i, w) in weights.iter_mut().enumerate() {
            let start = config.initial_weights[i];
            let end = config.final_weights[i];
            *w = f32::max(config.weight_floor, start + factor * (end - start));
        }
        PatternWeights(weights)
    }

    /// Normalized table the next draw will use, including streak correction.
    #[must_use]
    pub fn draw_weights(&self, elapsed: f32) -> PatternWeights {
        let mut weights = self.adaptive_weights(elapsed);
        if self.consecutive_close >= CLOSE_STREAK_LIMIT {
            weights.set(SpacingPattern::Close, 0.05);
            weights.add(SpacingPattern::Normal, 0.3);
            weights.add(SpacingPattern::Far, 0.2);
        } else if self.consecutive_far >= FAR_STREAK_LIMIT {
            weights.set(SpacingPattern::Far, 0.1);
            weights.add(SpacingPattern::Close, 0.2);
            weights.add(SpacingPattern::Normal, 0.1);
        }
        weights.normalized()
    }

    /// Draws a spacing bucket and updates the streak counters.
    ///
    /// # Panics
    ///
    /// Panics if the weight floor is not positive or a weight is not finite.
    pub fn choose_pattern(&mut self, elapsed: f32) -> SpacingPattern {
        let weights = self.draw_weights(elapsed);
        let index = WeightedIndex::new(weights.as_array())
            .expect("validated pattern weights are positive and finite")
            .sample(&mut self.rng);
        let pattern = SpacingPattern::ALL[index];

        match pattern {
            SpacingPattern::Close => {
                self.consecutive_close += 1;
                self.consecutive_far = 0;
            }
            SpacingPattern::Far => {
                self.consecutive_far += 1;
                self.consecutive_close = 0;
            }
            SpacingPattern::Normal | SpacingPattern::Mixed => {
                self.consecutive_close = 0;
                self.consecutive_far = 0;
            }
        }
        pattern
    }

    /// Draws the gap to leave behind the next obstacle.
    ///
    /// The result is never below the configured global minimum distance.
    ///
    /// # Panics
    ///
    /// Panics if the jitter is negative or [`Self::choose_pattern`] panics.
    #[expect(clippy::cast_precision_loss)]
    pub fn next_spawn_distance(&mut self, elapsed: f32) -> f32 {
        let pattern = self.choose_pattern(elapsed);
        let (min, max) = pattern.range();
        let base = self.rng.random_range(min..=max);
        let jitter = self.config.jitter;
        let variation = self.rng.random_range(-jitter..=jitter);
        let distance = f32::max(self.config.min_distance, (base + variation) as f32);
        self.last_distance = distance;
        distance
    }

    /// Checks whether a new obstacle may be spawned behind `last`.
    ///
    /// Spawning is eligible when there is no obstacle yet, or when `last` has
    /// travelled its spawn distance away from the right edge of a world
    /// `world_width` wide. When eligible, the spacing for the new obstacle is drawn
    /// and returned.
    pub fn should_spawn(
        &mut self,
        last: Option<&ObstacleDescriptor>,
        world_width: f32,
        elapsed: f32,
    ) -> Option<f32> {
        let eligible = last.is_none_or(|last| last.x < world_width - last.spawn_distance);
        eligible.then(|| self.next_spawn_distance(elapsed))
    }

    /// Like [`Self::should_spawn`], but an eligible spawn only happens with the
    /// configured spawn chance.
    ///
    /// # Panics
    ///
    /// Panics if the spawn chance is outside `[0, 1]`.
    pub fn try_spawn(
        &mut self,
        last: Option<&ObstacleDescriptor>,
        world_width: f32,
        elapsed: f32,
    ) -> Option<f32> {
        let distance = self.should_spawn(last, world_width, elapsed)?;
        self.rng
            .random_bool(self.config.spawn_chance)
            .then_some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ObstacleId;

    fn controller(seed: u128) -> DifficultyController {
        DifficultyController::new(DifficultyConfig::default(), GameSeed::from_u128(seed))
    }

    fn obstacle_at(x: f32, spawn_distance: f32) -> ObstacleDescriptor {
        ObstacleDescriptor {
            id: ObstacleId(0),
            x,
            y: 231.0,
            width: 48.0,
            height: 149.0,
            spawn_distance,
        }
    }

    #[test]
    fn test_speed_ramps_and_saturates() {
        let c = controller(0);
        assert_eq!(c.speed(0.0), 7.0);
        assert!((c.speed(30.0) - 10.0).abs() < 1e-5);
        assert_eq!(c.speed(80.0), 15.0);
        assert_eq!(c.speed(1000.0), 15.0);

        let mut prev = c.speed(0.0);
        for t in 1..200_u8 {
            let speed = c.speed(f32::from(t));
            assert!(speed >= prev);
            prev = speed;
        }
    }

    #[test]
    fn test_weights_drift_toward_final_table() {
        let c = controller(0);
        assert_eq!(c.adaptive_weights(0.0).as_array(), [0.2, 0.5, 0.2, 0.1]);
        let late = c.adaptive_weights(500.0).as_array();
        let expected = [0.5, 0.4, 0.05, 0.05];
        for (w, e) in late.iter().zip(expected) {
            assert!((w - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_draw_weights_always_sum_to_one() {
        let mut c = controller(0);
        for streak in [(0, 0), (3, 0), (5, 0), (0, 2), (0, 4)] {
            c.consecutive_close = streak.0;
            c.consecutive_far = streak.1;
            for t in (0..400).step_by(5) {
                #[expect(clippy::cast_precision_loss)]
                let weights = c.draw_weights(t as f32);
                assert!((weights.sum() - 1.0).abs() < 1e-5, "{streak:?} at {t}");
                assert!(weights.as_array().iter().all(|w| *w > 0.0));
            }
        }
    }

    #[test]
    fn test_close_streak_suppresses_close() {
        let mut c = controller(0);
        let plain = c.draw_weights(60.0);
        c.consecutive_close = 3;
        let corrected = c.draw_weights(60.0);
        assert!(corrected.get(SpacingPattern::Close) < plain.get(SpacingPattern::Close));
        assert!(corrected.get(SpacingPattern::Far) > plain.get(SpacingPattern::Far));
    }

    #[test]
    fn test_far_streak_suppresses_far() {
        let mut c = controller(0);
        let plain = c.draw_weights(0.0);
        c.consecutive_far = 2;
        let corrected = c.draw_weights(0.0);
        assert!(corrected.get(SpacingPattern::Far) < plain.get(SpacingPattern::Far));
        assert!(corrected.get(SpacingPattern::Close) > plain.get(SpacingPattern::Close));
    }

    #[test]
    fn test_streak_counters_follow_draws() {
        let mut c = controller(11);
        for _ in 0..500 {
            let (close, far) = (c.consecutive_close, c.consecutive_far);
            match c.choose_pattern(90.0) {
                SpacingPattern::Close => {
                    assert_eq!(c.consecutive_close, close + 1);
                    assert_eq!(c.consecutive_far, 0);
                }
                SpacingPattern::Far => {
                    assert_eq!(c.consecutive_far, far + 1);
                    assert_eq!(c.consecutive_close, 0);
                }
                SpacingPattern::Normal | SpacingPattern::Mixed => {
                    assert_eq!((c.consecutive_close, c.consecutive_far), (0, 0));
                }
            }
        }
    }

    #[test]
    fn test_spawn_distance_never_below_minimum() {
        let mut c = controller(3);
        for i in 0..5000_u16 {
            let distance = c.next_spawn_distance(f32::from(i % 300));
            assert!(distance >= 180.0);
            assert!(distance <= 470.0);
            assert_eq!(c.last_distance(), distance);
        }
    }

    #[test]
    fn test_first_obstacle_is_always_eligible() {
        let mut c = controller(5);
        assert!(c.should_spawn(None, 800.0, 0.0).is_some());
    }

    #[test]
    fn test_eligibility_waits_for_spawn_distance() {
        let mut c = controller(5);
        assert!(c.should_spawn(Some(&obstacle_at(600.0, 300.0)), 800.0, 0.0).is_none());
        assert!(c.should_spawn(Some(&obstacle_at(500.0, 300.0)), 800.0, 0.0).is_none());
        assert!(c.should_spawn(Some(&obstacle_at(499.0, 300.0)), 800.0, 0.0).is_some());
    }

    #[test]
    fn test_spawn_chance_is_about_two_thirds() {
        let mut c = controller(99);
        let trials = 6000;
        let spawned = (0..trials)
            .filter(|_| c.try_spawn(None, 800.0, 10.0).is_some())
            .count();
        #[expect(clippy::cast_precision_loss)]
        let ratio = spawned as f64 / f64::from(trials);
        assert!((0.62..0.71).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn test_boundary_configs_draw_without_panicking() {
        let configs = [
            DifficultyConfig {
                jitter: 0,
                spawn_chance: 0.0,
                ..DifficultyConfig::default()
            },
            DifficultyConfig {
                spawn_chance: 1.0,
                initial_weights: [0.0; 4],
                final_weights: [0.0; 4],
                ..DifficultyConfig::default()
            },
        ];
        for config in configs {
            config.validate().unwrap();
            let never = config.spawn_chance <= 0.0;
            let mut c = DifficultyController::new(config, GameSeed::from_u128(4));
            for t in 0..200_u16 {
                let spawned = c.try_spawn(None, 800.0, f32::from(t)).is_some();
                assert_eq!(spawned, !never);
                assert!(c.last_distance() >= 180.0);
            }
        }
    }
}
