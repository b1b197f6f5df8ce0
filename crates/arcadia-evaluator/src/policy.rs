//! The decision interface shared by every controller.

/// A feature vector of the wrong length was handed to a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid state shape: expected {expected} features, got {actual}")]
pub struct InvalidStateShape {
    pub expected: usize,
    pub actual: usize,
}

impl InvalidStateShape {
    /// Fails unless `state` has exactly `expected` values.
    pub fn check(state: &[f32], expected: usize) -> Result<(), Self> {
        if state.len() == expected {
            Ok(())
        } else {
            Err(Self {
                expected,
                actual: state.len(),
            })
        }
    }
}

/// Maps an input to one score per discrete action.
///
/// Scores are ordered like the game's action list
/// ([`RunnerAction::ALL`](arcadia_engine::runner::RunnerAction::ALL) or
/// [`Turn::ALL`](arcadia_engine::snake::Turn::ALL)); the caller picks the
/// action with [`arg_max`].
pub trait Policy {
    type Input: ?Sized;

    fn scores(&mut self, input: &Self::Input) -> Result<[f32; 3], InvalidStateShape>;
}

impl<P> Policy for &mut P
where
    P: Policy + ?Sized,
{
    type Input = P::Input;

    fn scores(&mut self, input: &Self::Input) -> Result<[f32; 3], InvalidStateShape> {
        (**self).scores(input)
    }
}

/// Index of the highest score. Ties go to the lowest index and NaN never wins.
#[must_use]
pub fn arg_max(scores: &[f32; 3]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] || scores[best].is_nan() {
            best = i;
        }
    }
    best
}

/// Score vector with 1 at `index` and 0 elsewhere.
#[must_use]
pub fn one_hot(index: usize) -> [f32; 3] {
    let mut scores = [0.0; 3];
    scores[index] = 1.0;
    scores
}
