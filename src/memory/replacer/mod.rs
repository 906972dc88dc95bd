//! Page replacement policies (replacers).
//!
//! Currently implements:
//! - [`OptimalReplacer`] - Belady's farthest-next-use, needs the whole trace
//! - [`ClockReplacer`] - second chance over a circular frame pointer
//! - [`NruReplacer`] - Not Recently Used, four (referenced, dirty) classes
//! - [`RandomReplacer`] - uniform victim from a seedable generator
//!
//! Each policy implements [`Replacer`]. [`ReplacementPolicy`] is the closed
//! set of the four, selected at runtime from a [`SimConfig`].

mod clock;
mod nru;
mod optimal;
mod random;

pub use clock::ClockReplacer;
pub use nru::NruReplacer;
pub use optimal::OptimalReplacer;
pub use random::RandomReplacer;

use log::{info, warn};

use crate::common::{Algorithm, FrameId, Result, SimConfig};
use crate::memory::{FrameTable, PageTable};
use crate::trace::MemoryAccess;

/// A page replacement policy.
///
/// The simulator calls [`record_access`](Replacer::record_access) after every
/// access and [`select_victim`](Replacer::select_victim) only when the frame
/// table is full. Both receive the zero-based position of the current access
/// in the trace.
pub trait Replacer {
    /// Short policy name for reports.
    fn name(&self) -> &'static str;

    /// Observe a completed access (hit or fault).
    ///
    /// The page table is mutable so policies can age reference bits.
    fn record_access(
        &mut self,
        _trace_index: usize,
        _frames: &FrameTable,
        _pages: &mut PageTable,
    ) -> Result<()> {
        Ok(())
    }

    /// Choose an occupied frame to evict.
    ///
    /// Must return a frame that currently holds a page. The simulator
    /// treats anything else as an invariant violation.
    fn select_victim(
        &mut self,
        trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<FrameId>;
}

/// One of the four built-in policies.
#[derive(Debug)]
pub enum ReplacementPolicy {
    Optimal(OptimalReplacer),
    Clock(ClockReplacer),
    Nru(NruReplacer),
    Random(RandomReplacer),
}

impl ReplacementPolicy {
    /// Build the policy named by `config`.
    ///
    /// `trace` is only consulted by the optimal policy, which indexes it
    /// up front.
    ///
    /// # Errors
    /// - Any configuration error from [`SimConfig::validate`]
    pub fn from_config(config: &SimConfig, trace: &[MemoryAccess]) -> Result<Self> {
        config.validate()?;
        match (config.algorithm, config.refresh) {
            (Algorithm::Nru, _) | (_, None) => {}
            (other, Some(refresh)) => warn!("refresh interval {refresh} ignored by {other}"),
        }

        let policy = match config.algorithm {
            Algorithm::Optimal => {
                ReplacementPolicy::Optimal(OptimalReplacer::new(trace.iter().map(|a| a.page())))
            }
            Algorithm::Clock => ReplacementPolicy::Clock(ClockReplacer::new()),
            Algorithm::Nru => {
                let refresh = config.refresh.unwrap_or_default();
                ReplacementPolicy::Nru(NruReplacer::new(refresh)?)
            }
            Algorithm::Random => ReplacementPolicy::Random(RandomReplacer::new(config.seed)),
        };

        info!("using {} replacement with {} frames", config.algorithm, config.frames);
        Ok(policy)
    }

    /// Which algorithm this is.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            ReplacementPolicy::Optimal(_) => Algorithm::Optimal,
            ReplacementPolicy::Clock(_) => Algorithm::Clock,
            ReplacementPolicy::Nru(_) => Algorithm::Nru,
            ReplacementPolicy::Random(_) => Algorithm::Random,
        }
    }

    fn as_replacer(&mut self) -> &mut dyn Replacer {
        match self {
            ReplacementPolicy::Optimal(r) => r,
            ReplacementPolicy::Clock(r) => r,
            ReplacementPolicy::Nru(r) => r,
            ReplacementPolicy::Random(r) => r,
        }
    }
}

impl Replacer for ReplacementPolicy {
    fn name(&self) -> &'static str {
        self.algorithm().name()
    }

    fn record_access(
        &mut self,
        trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<()> {
        self.as_replacer().record_access(trace_index, frames, pages)
    }

    fn select_victim(
        &mut self,
        trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<FrameId> {
        self.as_replacer().select_victim(trace_index, frames, pages)
    }
}
