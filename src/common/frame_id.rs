//! Physical frame numbers.

use std::fmt;

/// A physical frame number, `0..frames`.
///
/// The frame table is a fixed array of slots and a frame number is the
/// slot it names. Every [`AccessOutcome`](crate::AccessOutcome) reports the
/// frame the page ended up in, and the clock hand walks these numbers in
/// order.
///
/// # Example
/// ```
/// use vmsim::trace::MemoryAccess;
/// use vmsim::{Algorithm, SimConfig, Simulator};
///
/// let trace = [MemoryAccess::read(0x1000), MemoryAccess::read(0x2000)];
/// let config = SimConfig::new(4, Algorithm::Clock);
/// let mut sim = Simulator::from_config(&config, &trace).unwrap();
///
/// // Initial fill takes the lowest free slot first.
/// let first = sim.access(trace[0].page(), trace[0].op).unwrap();
/// let second = sim.access(trace[1].page(), trace[1].op).unwrap();
/// assert_eq!((first.frame.index(), second.frame.index()), (0, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl FrameId {
    #[inline]
    pub fn new(slot: usize) -> Self {
        FrameId(slot)
    }

    /// Slot in the frame table.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}
