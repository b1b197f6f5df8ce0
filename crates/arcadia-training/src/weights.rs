//! Genome operations for the genetic algorithm.
//!
//! A genome is the flat weight vector of a
//! [`FeedForwardNetwork`](arcadia_evaluator::network::FeedForwardNetwork), laid
//! out as [`NetworkLayout`](arcadia_evaluator::network::NetworkLayout)
//! describes. Every operation here is layout-agnostic: it only sees a slice of
//! `f32`.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws a genome uniformly from the weight box
//! - **Crossover**: [`blx_alpha`] blends two parents gene by gene
//! - **Mutation**: [`mutate`] perturbs a random subset of genes with Gaussian
//!   noise
//!
//! # Design Decisions
//!
//! ## Symmetric weight box
//!
//! Network weights feed `tanh` hidden units and a linear output layer, so their
//! sign carries meaning and no rescaling of a genome leaves its policy unchanged.
//! Genomes are therefore not normalized. Instead every operation keeps each gene
//! inside `[-max_weight, max_weight]`, and the bound is widened by the
//! [`PopulationDriver`](crate::driver::PopulationDriver) as training moves from
//! one [`EvolutionPhase`](crate::driver::EvolutionPhase) to the next.
//!
//! Genes are clamped, not reflected or redrawn. A gene pushed past the bound
//! sticks to it until a later crossover or mutation pulls it back.
//!
//! ## BLX-α crossover
//!
//! For parents `a` and `b` the child gene is drawn from
//!
//! ```text
//! [min(a, b) - α·|a - b|, max(a, b) + α·|a - b|]
//! ```
//!
//! With `α = 0` children stay between their parents; larger values let the
//! search step outside the region the parents span. Where both parents agree
//! the interval collapses and the child inherits the shared value exactly.
//!
//! ## Gaussian mutation
//!
//! Each gene is independently selected with probability `rate` and shifted by
//! `N(0, σ)`. The phase schedule shrinks `σ` over the run, so late generations
//! make small adjustments around the current champions.
//!
//! # Related
//!
//! - [`genetic`](crate::genetic) applies these operations to whole populations
//! - [`driver`](crate::driver) picks `σ` and the weight bound for each phase

use rand::Rng;
use rand_distr::Normal;

/// Draws a genome of `len` genes, each uniform in `[-max_weight, max_weight]`.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `max_weight` - Bound of the weight box, must be finite and non-negative
/// * `len` - Number of genes, usually
///   [`NetworkLayout::weight_count`](arcadia_evaluator::network::NetworkLayout::weight_count)
///
/// # Panics
///
/// Panics if `max_weight` is negative or not finite.
pub fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    std::iter::repeat_with(|| rng.random_range(-max_weight..=max_weight))
        .take(len)
        .collect()
}

/// Produces one child from two parents with BLX-α crossover.
///
/// Each child gene is drawn from the parents' interval widened by `alpha` times
/// its length on both sides, then clamped to `[-max_weight, max_weight]`.
///
/// # Arguments
///
/// * `p1`, `p2` - Parent genomes of the same length
/// * `alpha` - Interval expansion factor (0.0 keeps children between parents)
/// * `max_weight` - Bound of the weight box
/// * `rng` - Random number generator
///
/// # Returns
///
/// A new genome with the parents' length.
///
/// # Panics
///
/// Panics if the parents have different lengths.
///
/// # Examples
///
/// ```
/// use arcadia_engine::GameSeed;
/// use arcadia_training::weights;
///
/// let mut rng = GameSeed::from_u128(0).rng();
///
/// // Identical parents have nothing to blend.
/// let child = weights::blx_alpha(&[-0.5, 0.25], &[-0.5, 0.25], 0.5, 1.0, &mut rng);
/// assert_eq!(child, vec![-0.5, 0.25]);
///
/// // Wide expansion is still held inside the weight box.
/// let child = weights::blx_alpha(&[-1.0, 1.0], &[1.0, -1.0], 3.0, 1.0, &mut rng);
/// assert!(child.iter().all(|w| (-1.0..=1.0).contains(w)));
/// ```
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, max_weight: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len(), "parent genomes differ in length");
    p1.iter()
        .zip(p2)
        .map(|(&a, &b)| blend_gene(a, b, alpha, rng).clamp(-max_weight, max_weight))
        .collect()
}

fn blend_gene<R>(a: f32, b: f32, alpha: f32, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let spread = alpha * (hi - lo);
    rng.random_range(lo - spread..=hi + spread)
}

/// Applies Gaussian mutation in place.
///
/// # Arguments
///
/// * `genome` - Genome to perturb
/// * `sigma` - Standard deviation of the noise
/// * `max_weight` - Bound of the weight box; mutated genes are clamped to it
/// * `rate` - Probability that any single gene is selected
/// * `rng` - Random number generator
///
/// # Returns
///
/// Number of genes that were selected for mutation.
///
/// # Panics
///
/// Panics if `sigma` is negative or NaN, or `rate` is outside `[0, 1]`.
pub fn mutate<R>(genome: &mut [f32], sigma: f32, max_weight: f32, rate: f32, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let noise = Normal::new(0.0, sigma).expect("mutation sigma must be non-negative");
    let rate = f64::from(rate);
    let mut mutated = 0;
    for gene in genome {
        if !rng.random_bool(rate) {
            continue;
        }
        *gene = (*gene + rng.sample(noise)).clamp(-max_weight, max_weight);
        mutated += 1;
    }
    mutated
}

#[cfg(test)]
mod tests {
    use arcadia_engine::GameSeed;

    use super::*;

    #[test]
    fn test_random_covers_both_signs() {
        let mut rng = GameSeed::from_u128(1).rng();
        let genome = random(&mut rng, 0.5, 1000);
        assert_eq!(genome.len(), 1000);
        assert!(genome.iter().all(|w| (-0.5..=0.5).contains(w)));
        assert!(genome.iter().any(|w| *w < -0.25));
        assert!(genome.iter().any(|w| *w > 0.25));
    }

    #[test]
    fn test_random_empty_genome() {
        let mut rng = GameSeed::from_u128(1).rng();
        assert!(random(&mut rng, 1.0, 0).is_empty());
    }

    #[test]
    fn test_blx_alpha_zero_stays_between_parents() {
        let mut rng = GameSeed::from_u128(2).rng();
        let p1 = [-0.5, 0.0, 0.75];
        let p2 = [0.5, 0.0, 0.25];
        for _ in 0..100 {
            let child = blx_alpha(&p1, &p2, 0.0, 1.0, &mut rng);
            for ((c, a), b) in child.iter().zip(p1).zip(p2) {
                assert!((a.min(b)..=a.max(b)).contains(c), "{c} outside [{a}, {b}]");
            }
            assert_eq!(child[1], 0.0);
        }
    }

    #[test]
    fn test_blx_alpha_reaches_outside_parents() {
        let mut rng = GameSeed::from_u128(5).rng();
        let outside = (0..200)
            .map(|_| blx_alpha(&[-0.1], &[0.1], 1.0, 1.0, &mut rng)[0])
            .filter(|w| w.abs() > 0.1)
            .count();
        assert!(outside > 0);
        assert!(outside < 200);
    }

    #[test]
    fn test_blx_alpha_is_clamped() {
        let mut rng = GameSeed::from_u128(3).rng();
        for _ in 0..100 {
            let child = blx_alpha(&[-1.0, 1.0], &[1.0, -1.0], 2.0, 1.0, &mut rng);
            assert!(child.iter().all(|w| (-1.0..=1.0).contains(w)));
        }
    }

    #[test]
    #[should_panic(expected = "parent genomes differ in length")]
    fn test_blx_alpha_rejects_mismatched_parents() {
        let mut rng = GameSeed::from_u128(3).rng();
        let _ = blx_alpha(&[0.0, 0.0], &[0.0], 0.5, 1.0, &mut rng);
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = GameSeed::from_u128(4).rng();
        let original = vec![0.1; 50];

        let mut unchanged = original.clone();
        assert_eq!(mutate(&mut unchanged, 0.5, 1.0, 0.0, &mut rng), 0);
        assert_eq!(unchanged, original);

        let mut changed = original.clone();
        assert_eq!(mutate(&mut changed, 0.5, 1.0, 1.0, &mut rng), 50);
        assert!(changed.iter().zip(&original).filter(|(a, b)| a != b).count() > 40);
        assert!(changed.iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn test_mutate_zero_sigma_keeps_values() {
        let mut rng = GameSeed::from_u128(6).rng();
        let mut genome = vec![0.3, -0.7, 2.0];
        assert_eq!(mutate(&mut genome, 0.0, 1.0, 1.0, &mut rng), 3);
        // Only the out-of-box gene moves, back onto the bound.
        assert_eq!(genome, vec![0.3, -0.7, 1.0]);
    }
}
