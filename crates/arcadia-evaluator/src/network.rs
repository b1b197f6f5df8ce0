//! Fixed-topology feed-forward network used as the evolved snake policy.
//!
//! The genome is the flat weight vector. Layers are stored one after another;
//! each layer holds, for every output neuron, its bias followed by one weight per
//! input. Hidden layers use `tanh`, the output layer is linear and produces one
//! score per [`Turn`](arcadia_engine::snake::Turn).

use serde::{Deserialize, Serialize};

use crate::policy::{InvalidStateShape, Policy};

pub const OUTPUTS: usize = 3;

/// Persisted network bytes could not be turned back into a network.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PolicyDecodeError {
    #[display("malformed network data: {_0}")]
    Json(serde_json::Error),
    #[display("network layout needs {expected} weights, got {actual}")]
    WeightCount {
        expected: usize,
        actual: usize,
    },
    #[display("network layout is too large to address its weights")]
    LayoutTooLarge,
}

/// Layer sizes of a network. The output layer always has [`OUTPUTS`] neurons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub inputs: usize,
    pub hidden: Vec<usize>,
}

impl NetworkLayout {
    #[must_use]
    pub fn new(inputs: usize, hidden: Vec<usize>) -> Self {
        Self { inputs, hidden }
    }

    /// `(inputs, outputs)` of every layer, input side first.
    fn layers(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let sizes = || {
            std::iter::once(self.inputs)
                .chain(self.hidden.iter().copied())
                .chain(std::iter::once(OUTPUTS))
        };
        sizes().zip(sizes().skip(1))
    }

    /// Length of the genome for this layout, or `None` if it does not fit in
    /// a `usize`.
    #[must_use]
    pub fn checked_weight_count(&self) -> Option<usize> {
        self.layers().try_fold(0_usize, |total, (inputs, outputs)| {
            inputs
                .checked_add(1)?
                .checked_mul(outputs)?
                .checked_add(total)
        })
    }

    /// Length of the genome for this layout.
    ///
    /// # Panics
    ///
    /// Panics if the count overflows `usize`. Layouts read from untrusted data
    /// go through [`NetworkLayout::checked_weight_count`] instead.
    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.checked_weight_count()
            .expect("network layout weight count overflows usize")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkParts")]
pub struct FeedForwardNetwork {
    layout: NetworkLayout,
    weights: Vec<f32>,
}

#[derive(Deserialize)]
struct NetworkParts {
    layout: NetworkLayout,
    weights: Vec<f32>,
}

impl TryFrom<NetworkParts> for FeedForwardNetwork {
    type Error = PolicyDecodeError;

    fn try_from(parts: NetworkParts) -> Result<Self, Self::Error> {
        Self::new(parts.layout, parts.weights)
    }
}

impl FeedForwardNetwork {
    pub fn new(layout: NetworkLayout, weights: Vec<f32>) -> Result<Self, PolicyDecodeError> {
        let expected = layout
            .checked_weight_count()
            .ok_or(PolicyDecodeError::LayoutTooLarge)?;
        if weights.len() != expected {
            return Err(PolicyDecodeError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { layout, weights })
    }

    #[must_use]
    pub fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Runs the network on `input`.
    pub fn forward(&self, input: &[f32]) -> Result<[f32; OUTPUTS], InvalidStateShape> {
        InvalidStateShape::check(input, self.layout.inputs)?;

        let layer_count = self.layout.hidden.len() + 1;
        let mut activations = input.to_vec();
        let mut offset = 0;
        for (index, (inputs, outputs)) in self.layout.layers().enumerate() {
            let is_output = index + 1 == layer_count;
            let next: Vec<f32> = (0..outputs)
                .map(|neuron| {
                    let start = offset + neuron * (inputs + 1);
                    let row = &self.weights[start..start + inputs + 1];
                    let sum = row[0]
                        + row[1..]
                            .iter()
                            .zip(&activations)
                            .map(|(w, x)| w * x)
                            .sum::<f32>();
                    if is_output { sum } else { sum.tanh() }
                })
                .collect();
            activations = next;
            offset += outputs * (inputs + 1);
        }

        let mut scores = [0.0; OUTPUTS];
        scores.copy_from_slice(&activations);
        Ok(scores)
    }

    /// Encodes the network as JSON bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("network contains only plain numbers")
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, PolicyDecodeError> {
        serde_json::from_slice(bytes).map_err(PolicyDecodeError::Json)
    }
}

impl Policy for FeedForwardNetwork {
    type Input = [f32];

    fn scores(&mut self, input: &[f32]) -> Result<[f32; 3], InvalidStateShape> {
        self.forward(input)
    }
}
