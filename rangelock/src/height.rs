//! Random height sampler.
//!
//! Returns a level `h` in `[0, H)` with a geometric distribution and
//! parameter `p = 1/2`: `P(h >= l) = 2^-l`. `max_height` is a per-instance
//! value rather than a fixed constant, so each `RangeLock` can size its
//! skip list independently.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) struct HeightSampler {
    max_height: usize,
    rng: Mutex<StdRng>,
}

impl HeightSampler {
    pub(crate) fn new(max_height: usize) -> Self {
        Self {
            max_height,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Samples a height in `[0, max_height)`, capped at `max_height - 1`.
    pub(crate) fn sample(&self) -> usize {
        let mut height = 0;
        let mut rng = self.rng.lock();

        while height + 1 < self.max_height && rng.gen_bool(0.5) {
            height += 1;
        }

        height
    }
}
