//! Simulator - the per-access page fault state machine.
//!
//! The [`Simulator`] owns the page table, frame table, replacement policy
//! and statistics for one run, and processes accesses strictly in trace
//! order.

use std::fmt;

use log::{debug, info, trace};

use crate::common::{Error, FrameId, PageId, Result, SimConfig};
use crate::memory::replacer::{ReplacementPolicy, Replacer};
use crate::memory::{FrameTable, PageTable, PageTableEntry, SimStats};
use crate::trace::{MemoryAccess, Operation};

/// What one access did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    /// Page was already resident.
    Hit,

    /// Page loaded into a free frame.
    FaultNoEvict,

    /// Page loaded after evicting a clean page.
    FaultEvictClean { victim: PageId },

    /// Page loaded after evicting a dirty page (one writeback).
    FaultEvictDirty { victim: PageId },
}

impl AccessAction {
    pub fn is_fault(self) -> bool {
        self != AccessAction::Hit
    }

    /// Page evicted to make room, if any.
    pub fn victim(self) -> Option<PageId> {
        match self {
            AccessAction::FaultEvictClean { victim } | AccessAction::FaultEvictDirty { victim } => {
                Some(victim)
            }
            AccessAction::Hit | AccessAction::FaultNoEvict => None,
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessAction::Hit => write!(f, "hit"),
            AccessAction::FaultNoEvict => write!(f, "page fault - no eviction"),
            AccessAction::FaultEvictClean { victim } => {
                write!(f, "page fault - evict clean {victim}")
            }
            AccessAction::FaultEvictDirty { victim } => {
                write!(f, "page fault - evict dirty {victim} (write to disk)")
            }
        }
    }
}

/// Result of one access, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Zero-based position in the trace.
    pub index: usize,

    /// Page that was accessed.
    pub page: PageId,

    pub op: Operation,

    /// Frame now holding `page`.
    pub frame: FrameId,

    pub action: AccessAction,
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}: {}",
            self.page, self.op, self.frame, self.action
        )
    }
}

/// End-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub algorithm: &'static str,
    pub frames: usize,
    pub stats: SimStats,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm:             {}", self.algorithm)?;
        writeln!(f, "Number of frames:      {}", self.frames)?;
        writeln!(f, "Total memory accesses: {}", self.stats.accesses)?;
        writeln!(f, "Total page faults:     {}", self.stats.page_faults)?;
        write!(f, "Total writes to disk:  {}", self.stats.writebacks)
    }
}

/// Runs accesses against a fixed set of frames.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────┐
/// │                      Simulator                        │
/// │  ┌──────────────┐        ┌──────────────────────────┐ │
/// │  │  page_table  │        │  frames: FrameTable      │ │
/// │  │PageId → PTE  │◀──────▶│  [F0] [F1] [F2] ...      │ │
/// │  └──────────────┘        └──────────────────────────┘ │
/// │  ┌──────────────┐        ┌──────────────┐             │
/// │  │   replacer   │        │    stats     │             │
/// │  │ R: Replacer  │        │   SimStats   │             │
/// │  └──────────────┘        └──────────────┘             │
/// └───────────────────────────────────────────────────────┘
/// ```
///
/// The page table and frame table are only mutated here, together, so
/// that a page is valid iff exactly one frame names it.
///
/// # Usage
/// ```
/// use vmsim::{Algorithm, SimConfig, Simulator};
/// use vmsim::trace::MemoryAccess;
///
/// let trace = vec![
///     MemoryAccess::read(0x1000),
///     MemoryAccess::write(0x2000),
///     MemoryAccess::read(0x1004),
/// ];
///
/// let config = SimConfig::new(2, Algorithm::Clock);
/// let mut sim = Simulator::from_config(&config, &trace).unwrap();
/// sim.run(&trace, |_| Ok(())).unwrap();
///
/// assert_eq!(sim.stats().page_faults, 2);
/// assert_eq!(sim.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct Simulator<R: Replacer = ReplacementPolicy> {
    frames: FrameTable,
    page_table: PageTable,
    replacer: R,
    stats: SimStats,

    /// Trace position of the next access.
    next_index: usize,
}

impl Simulator<ReplacementPolicy> {
    /// Build a simulator for `config`.
    ///
    /// `trace` must be the trace that will be fed to [`run`](Self::run);
    /// the optimal policy indexes it here.
    ///
    /// # Errors
    /// - Any configuration error from [`SimConfig::validate`]
    pub fn from_config(config: &SimConfig, trace: &[MemoryAccess]) -> Result<Self> {
        let replacer = ReplacementPolicy::from_config(config, trace)?;
        Self::new(config.frames, replacer)
    }
}

impl<R: Replacer> Simulator<R> {
    /// Create a simulator with `frames` empty frames.
    ///
    /// # Errors
    /// - `Error::InvalidFrameCount` if `frames` is 0
    pub fn new(frames: usize, replacer: R) -> Result<Self> {
        Ok(Self {
            frames: FrameTable::new(frames)?,
            page_table: PageTable::new(),
            replacer,
            stats: SimStats::new(),
            next_index: 0,
        })
    }

    // ========================================================================
    // Public API: Accesses
    // ========================================================================

    /// Process one access.
    ///
    /// # Errors
    /// Only bookkeeping errors, which mean the replacer returned a bad
    /// victim or the tables disagree.
    pub fn access(&mut self, page: PageId, op: Operation) -> Result<AccessOutcome> {
        let index = self.next_index;
        let resident = self.page_table.lookup(page).and_then(PageTableEntry::frame);

        let (frame, action) = match resident {
            Some(frame) => (frame, AccessAction::Hit),
            None => self.handle_fault(page, index)?,
        };

        self.page_table.mark_referenced(page)?;
        if op.is_write() {
            self.page_table.mark_dirty(page)?;
        }

        self.stats.accesses += 1;
        if action.is_fault() {
            self.stats.page_faults += 1;
        } else {
            self.stats.hits += 1;
        }

        self.replacer
            .record_access(index, &self.frames, &mut self.page_table)?;
        self.next_index += 1;

        let outcome = AccessOutcome {
            index,
            page,
            op,
            frame,
            action,
        };
        trace!("access {}: {}", index, outcome);
        Ok(outcome)
    }

    /// Process every access in `trace`, handing each outcome to `report`.
    ///
    /// Stops at the first error, whether from the simulation or from
    /// `report`. An access whose report failed has still been applied, so
    /// [`trace_index`](Self::trace_index) counts it.
    pub fn run<F>(&mut self, trace: &[MemoryAccess], mut report: F) -> Result<()>
    where
        F: FnMut(&AccessOutcome) -> Result<()>,
    {
        for access in trace {
            let outcome = self.access(access.page(), access.op)?;
            report(&outcome)?;
        }

        info!(
            "{} finished: {} accesses, {} faults, {} writebacks",
            self.replacer.name(),
            self.stats.accesses,
            self.stats.page_faults,
            self.stats.writebacks
        );
        Ok(())
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn replacer(&self) -> &R {
        &self.replacer
    }

    /// Number of accesses processed so far.
    pub fn trace_index(&self) -> usize {
        self.next_index
    }

    /// Summary record for the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            algorithm: self.replacer.name(),
            frames: self.frames.capacity(),
            stats: self.stats,
        }
    }

    /// Check that the page table and frame table agree.
    ///
    /// - occupied frames == valid pages <= capacity
    /// - every occupied frame's page names that frame back
    ///
    /// The second rule also rules out a page sitting in two frames.
    pub fn check_invariants(&self) -> Result<()> {
        let occupied = self.frames.len();
        let valid = self.page_table.resident().count();

        if occupied != valid || occupied > self.frames.capacity() {
            return Err(Error::InvariantViolation(format!(
                "{occupied} occupied frames but {valid} valid pages (capacity {})",
                self.frames.capacity()
            )));
        }

        for (frame, page) in self.frames.iter() {
            let entry = self
                .page_table
                .lookup(page)
                .ok_or(Error::PageNotFound(page))?;
            if entry.frame() != Some(frame) {
                return Err(Error::InvariantViolation(format!(
                    "{frame} holds {page} but its entry says {:?}",
                    entry.frame()
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Internal: Faults and eviction
    // ========================================================================

    /// Bring `page` into a frame, evicting if every frame is taken.
    fn handle_fault(&mut self, page: PageId, index: usize) -> Result<(FrameId, AccessAction)> {
        let (frame, action) = if self.frames.is_full() {
            self.evict(index)?
        } else {
            let frame = self.frames.next_free_frame().ok_or_else(|| {
                Error::InvariantViolation("frame table not full but has no free frame".to_string())
            })?;
            (frame, AccessAction::FaultNoEvict)
        };

        if self.page_table.lookup(page).is_none() {
            self.page_table.insert(PageTableEntry::new(page))?;
        }
        self.frames.occupy(frame, page)?;
        self.page_table.mark_resident(page, frame)?;

        Ok((frame, action))
    }

    /// Ask the replacer for a victim and free its frame.
    fn evict(&mut self, index: usize) -> Result<(FrameId, AccessAction)> {
        let frame = self
            .replacer
            .select_victim(index, &self.frames, &mut self.page_table)?;

        let victim = self.frames.vacate(frame).map_err(|e| {
            Error::InvariantViolation(format!("{} chose an unusable victim: {e}", self.replacer.name()))
        })?;

        let evicted = self.page_table.mark_evicted(victim)?;
        if evicted.frame() != Some(frame) {
            return Err(Error::InvariantViolation(format!(
                "{victim} was in {frame} but its entry said {:?}",
                evicted.frame()
            )));
        }

        self.stats.evictions += 1;
        let action = if evicted.is_dirty() {
            self.stats.writebacks += 1;
            AccessAction::FaultEvictDirty { victim }
        } else {
            AccessAction::FaultEvictClean { victim }
        };

        debug!("access {}: evicted {} from {} ({})", index, victim, frame, action);
        Ok((frame, action))
    }
}

/// Run a whole trace under `config` and return the summary.
///
/// # Errors
/// - Any configuration error, before the first access
/// - Any bookkeeping error raised while simulating
pub fn simulate(config: &SimConfig, trace: &[MemoryAccess]) -> Result<RunSummary> {
    let mut sim = Simulator::from_config(config, trace)?;
    sim.run(trace, |_| Ok(()))?;
    Ok(sim.summary())
}
