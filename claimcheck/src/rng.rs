//! Random source plumbing.
//!
//! Every combinator draws from an explicitly passed `rand::RngCore`; nothing
//! reads a process-wide generator. A check run picks one base seed and
//! derives a per-claim seed from it, so a run can be replayed exactly and
//! claims can be evaluated on different threads without changing results.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Trait for providing random number generators
pub trait RngProvider: Send + Sync {
    /// The type of RNG this provider creates
    type Rng: RngCore + Send;

    /// Create a new RNG instance with an optional seed
    fn create_rng(&self, seed: Option<u64>) -> Self::Rng;
}

/// Default RNG provider using `StdRng`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRngProvider;

impl RngProvider for DefaultRngProvider {
    type Rng = StdRng;

    fn create_rng(&self, seed: Option<u64>) -> Self::Rng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Create a seeded RNG with the default provider
pub fn create_seeded_rng(seed: u64) -> StdRng {
    DefaultRngProvider.create_rng(Some(seed))
}

/// Pick a fresh base seed from entropy
pub fn entropy_seed() -> u64 {
    DefaultRngProvider.create_rng(None).next_u64()
}

/// Derive the seed for the claim at `index` from a run's base seed.
///
/// Uses the splitmix64 finalizer so neighbouring indices get unrelated streams.
pub fn derive_seed(base: u64, index: usize) -> u64 {
    let mut z = base.wrapping_add((index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform draw in `[0, 1)`
pub fn unit(rng: &mut dyn RngCore) -> f64 {
    rng.r#gen::<f64>()
}

/// Uniform index in `[0, len)`; `len` must be non-zero
pub(crate) fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    ((unit(rng) * len as f64) as usize).min(len - 1)
}
