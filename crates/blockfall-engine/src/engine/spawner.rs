use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Source of the shape kind for each newly spawned piece.
///
/// [`Game`](super::Game) draws exactly one kind per spawn. Implement this to
/// control the piece sequence, e.g. in tests.
pub trait ShapeSource {
    /// Returns the kind of the next piece.
    fn next_kind(&mut self) -> PieceKind;
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed used to initialize the random number generator of
/// [`PieceSpawner`]. The same seed produces the same sequence of pieces.
/// Written and parsed as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, PieceSpawner, ShapeSource as _};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
///
/// let mut a = PieceSpawner::with_seed(seed);
/// let mut b = PieceSpawner::with_seed(seed);
/// assert_eq!(a.next_kind(), b.next_kind());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError {
                reason: format!("{s} (non-hex character)"),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Picks each piece kind uniformly at random.
///
/// Every spawn is an independent draw over the seven kinds, so the same kind
/// may repeat any number of times in a row.
#[derive(Debug, Clone)]
pub struct PieceSpawner {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSpawner {
    /// Creates a spawner with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Returns the seed this spawner was created with.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl ShapeSource for PieceSpawner {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Replays a fixed list of kinds, starting over after the last one.
///
/// # Panics
///
/// [`SequenceSource::new`] panics if the list is empty.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl SequenceSource {
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "sequence must not be empty");
        Self { kinds, next: 0 }
    }
}

impl ShapeSource for SequenceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> PieceSeed {
        PieceSeed(bytes)
    }

    #[test]
    fn test_seed_known_value_sequential_bytes() {
        let seed = seed_from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_parse_accepts_uppercase() {
        let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_seed_parse_errors() {
        let too_short = "0123456789abcdef0123456789abcde".parse::<PieceSeed>();
        assert!(too_short.unwrap_err().to_string().contains("invalid hex"));

        let not_hex = "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<PieceSeed>();
        assert!(not_hex.unwrap_err().to_string().contains("invalid hex"));

        let signed = "+123456789abcdef0123456789abcdef".parse::<PieceSeed>();
        assert!(signed.unwrap_err().to_string().contains("non-hex character"));

        assert!(serde_json::from_str::<PieceSeed>("\"\"").is_err());
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed: PieceSeed = rand::rng().random();
        let mut spawner1 = PieceSpawner::with_seed(seed);
        let mut spawner2 = PieceSpawner::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(spawner1.next_kind(), spawner2.next_kind());
        }
        assert_eq!(spawner1.seed(), seed);
    }

    #[test]
    fn test_spawner_produces_every_kind() {
        let mut spawner = PieceSpawner::with_seed(seed_from_bytes([7; 16]));
        let kinds: HashSet<_> = (0..500).map(|_| spawner.next_kind()).collect();
        assert_eq!(kinds.len(), PieceKind::LEN);
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new([PieceKind::O, PieceKind::I]);
        let kinds: Vec<_> = (0..5).map(|_| source.next_kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PieceKind::O,
                PieceKind::I,
                PieceKind::O,
                PieceKind::I,
                PieceKind::O
            ]
        );
    }
}
