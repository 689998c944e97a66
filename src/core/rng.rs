//! Seeded random source shared by generation and planning.
//!
//! Every entry point takes `&mut R where R: Rng + ?Sized`; this module only
//! decides which concrete generator the binary hands in.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Generator used for real runs.
pub type GameRng = ChaCha20Rng;

/// Seeded generator plus the seed that was used, so the run can be replayed.
///
/// Without an explicit seed a random one is drawn from the thread RNG.
pub fn seeded(seed: Option<u64>) -> (GameRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (ChaCha20Rng::seed_from_u64(seed), seed)
}
