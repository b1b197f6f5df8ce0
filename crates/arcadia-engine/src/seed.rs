use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a simulator's random number generator.
///
/// Every stochastic part of a simulator (food placement, obstacle spacing, spawn
/// chance) draws from a [`Pcg32`] created from one of these. Two simulators built
/// from the same seed and driven by the same actions evolve identically, which is
/// what lets a whole generation of candidates face the same board.
///
/// Seeds are written as 32-character lowercase hex strings.
///
/// # Example
///
/// ```
/// use arcadia_engine::GameSeed;
///
/// let seed: GameSeed = "000000000000000000000000000000ff".parse().unwrap();
/// assert_eq!(seed, GameSeed::from_u128(255));
/// assert_eq!(seed.to_string(), "000000000000000000000000000000ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl GameSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Creates the random number generator driven by this seed.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let value = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(value))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore as _;

    use super::*;

    #[test]
    fn test_serializes_as_padded_hex() {
        let json = serde_json::to_string(&GameSeed::from_u128(0xabc)).unwrap();
        assert_eq!(json, "\"00000000000000000000000000000abc\"");
    }

    #[test]
    fn test_deserialize_rejects_short_and_non_hex_input() {
        assert!(serde_json::from_str::<GameSeed>("\"abc\"").is_err());
        assert!(serde_json::from_str::<GameSeed>("\"zz000000000000000000000000000000\"").is_err());
    }

    #[test]
    fn test_random_seed_survives_json() {
        let seed: GameSeed = rand::rng().random();
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(serde_json::from_str::<GameSeed>(&json).unwrap(), seed);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = GameSeed::from_u128(42);
        let mut a = seed.rng();
        let mut b = seed.rng();
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }
}
