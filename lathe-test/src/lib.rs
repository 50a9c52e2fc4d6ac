//! Test frameworks shared by the lathe crates.
//!
//! Unit tests need reproducible randomness: a failing homomorphic-operation
//! test is only debuggable if the sampled keys and errors can be re-created.
//! All tests draw from [`test_rng`] so a failure message's seed pins down the
//! entire run.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// The seed used by [`test_rng`].
///
/// Change it locally to shake out seed-dependent test failures, but always
/// commit the constant unchanged.
pub const TEST_RNG_SEED: u64 = 0x6c61_7468_655f_7368;

/// Returns the deterministic RNG used throughout the test suites.
pub fn test_rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(TEST_RNG_SEED)
}

/// Returns a deterministic RNG for tests that need several independent
/// streams, for example "two keygens draw different randomness".
pub fn test_rng_with(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Initialises `env_logger` for a test binary.
///
/// Safe to call from every test; only the first call installs the logger.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
