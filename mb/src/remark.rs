//! Random remark selection for celebration and motivation lines

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Picks lines from configured remark pools
///
/// Holds its own RNG so flows can be seeded for deterministic tests.
pub struct RemarkPicker {
    rng: StdRng,
}

impl RemarkPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Picker with a fixed seed, for reproducible selection
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick one line from the pool, or None if the pool is empty
    pub fn pick<'a>(&mut self, pool: &'a [String]) -> Option<&'a str> {
        pool.choose(&mut self.rng).map(String::as_str)
    }
}

impl Default for RemarkPicker {
    fn default() -> Self {
        Self::new()
    }
}
