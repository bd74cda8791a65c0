//! Random sources for stochastic strategies
//!
//! Every consumer takes an explicit `&mut impl Rng`; these helpers only decide
//! how that generator is constructed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic generator: same seed = same sequence
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from operating system entropy
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}

/// Private generator for one match of a seeded tournament
///
/// Lets matches run in any order (or in parallel) while each still
/// draws a reproducible stream.
pub fn for_match(seed: u64, match_index: usize) -> StdRng {
    let mixed = seed ^ (match_index as u64).wrapping_add(1).wrapping_mul(0x517cc1b727220a95);
    StdRng::seed_from_u64(mixed)
}
