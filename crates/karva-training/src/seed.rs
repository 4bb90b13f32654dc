//! Seeds for reproducible evolutionary runs.

use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed of the random generator driving a population.
///
/// This is a 128-bit (16-byte) seed for [`Pcg32`]. Two populations built
/// from the same spec, parameters and seed evolve identically, which makes
/// runs reproducible and reports replayable.
///
/// Serializes as a 32-character lowercase hex string.
///
/// # Example
///
/// ```
/// use karva_training::seed::EvolutionSeed;
/// use rand::Rng as _;
///
/// let seed: EvolutionSeed = rand::rng().random();
/// let hex = seed.to_string();
/// assert_eq!(hex.len(), 32);
/// assert_eq!(hex.parse::<EvolutionSeed>().unwrap(), seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvolutionSeed([u8; 16]);

impl EvolutionSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates the generator this seed stands for.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

/// Error parsing an [`EvolutionSeed`] from hex.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("invalid hex seed '{input}': expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl std::error::Error for ParseSeedError {}

impl fmt::Display for EvolutionSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}")?;
        f.write_str(&hex_str)
    }
}

impl std::str::FromStr for EvolutionSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for EvolutionSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EvolutionSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<EvolutionSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EvolutionSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        EvolutionSeed(seed)
    }
}
