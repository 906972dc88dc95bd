//! Random replacement policy.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::common::{Error, FrameId, Result};
use crate::memory::replacer::Replacer;
use crate::memory::{FrameTable, PageTable};

/// Evicts a uniformly random occupied frame.
///
/// The generator is injected, never global: [`RandomReplacer::new`] seeds a
/// [`StdRng`], and [`RandomReplacer::with_rng`] accepts any other
/// [`RngCore`] so tests can pin the sequence.
///
/// # Example
/// ```
/// use rand::rngs::mock::StepRng;
/// use vmsim::memory::replacer::RandomReplacer;
///
/// let _seeded = RandomReplacer::new(42);
/// let _scripted = RandomReplacer::with_rng(StepRng::new(0, 1));
/// ```
pub struct RandomReplacer {
    rng: Box<dyn RngCore>,
}

impl RandomReplacer {
    /// Random replacer driven by a `StdRng` seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Random replacer driven by the given generator.
    pub fn with_rng<R: RngCore + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }
}

impl fmt::Debug for RandomReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomReplacer").finish_non_exhaustive()
    }
}

impl Replacer for RandomReplacer {
    fn name(&self) -> &'static str {
        "rand"
    }

    fn select_victim(
        &mut self,
        _trace_index: usize,
        frames: &FrameTable,
        _pages: &mut PageTable,
    ) -> Result<FrameId> {
        let occupied: Vec<FrameId> = frames.iter().map(|(frame, _)| frame).collect();
        if occupied.is_empty() {
            return Err(Error::InvariantViolation(
                "random asked for a victim with no resident pages".to_string(),
            ));
        }

        let pick = self.rng.gen_range(0..occupied.len());
        Ok(occupied[pick])
    }
}
