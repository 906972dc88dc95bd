//! Simulation statistics.

use std::fmt;

/// Counters for one run.
///
/// Owned by the [`Simulator`](super::Simulator) and only ever bumped by it,
/// one access at a time.
///
/// # Example
/// ```
/// use vmsim::SimStats;
///
/// let stats = SimStats::new();
/// assert_eq!(stats.accesses, 0);
/// assert_eq!(stats.hit_rate(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Total memory accesses processed.
    pub accesses: u64,

    /// Accesses whose page was already resident.
    pub hits: u64,

    /// Accesses whose page had to be loaded.
    pub page_faults: u64,

    /// Faults that had to evict a resident page.
    pub evictions: u64,

    /// Evictions of dirty pages (simulated disk writes).
    pub writebacks: u64,
}

impl SimStats {
    /// Create a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of accesses that hit (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Fraction of accesses that faulted (0.0 to 1.0).
    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.page_faults as f64 / self.accesses as f64
        }
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ accesses: {}, faults: {}, writebacks: {}, hit_rate: {:.2}% }}",
            self.accesses,
            self.page_faults,
            self.writebacks,
            self.hit_rate() * 100.0
        )
    }
}
