//! Optimal (Belady) replacement policy.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::common::{Error, FrameId, PageId, Result};
use crate::memory::replacer::Replacer;
use crate::memory::{FrameTable, PageTable};

/// Evicts the resident page whose next use is farthest in the future.
///
/// Not an online algorithm: the whole trace is indexed at construction.
/// For each page we keep the sorted list of positions where it is
/// referenced, so "next use after `i`" is a binary search.
///
/// Pages never used again count as infinitely far. Among equally far
/// pages the least recently used one goes first, then the lowest frame
/// index.
///
/// # Example
/// ```
/// use vmsim::memory::replacer::OptimalReplacer;
/// use vmsim::PageId;
///
/// let trace = [1, 2, 1, 3].map(PageId::new);
/// let opt = OptimalReplacer::new(trace);
///
/// assert_eq!(opt.next_use(PageId::new(1), 0), Some(2));
/// assert_eq!(opt.next_use(PageId::new(2), 1), None);
/// ```
#[derive(Debug, Default)]
pub struct OptimalReplacer {
    /// Page -> ascending trace positions where it is referenced.
    positions: HashMap<PageId, Vec<usize>>,

    /// Length of the indexed trace.
    len: usize,
}

impl OptimalReplacer {
    /// Index a trace of page references.
    pub fn new<I>(trace: I) -> Self
    where
        I: IntoIterator<Item = PageId>,
    {
        let mut positions: HashMap<PageId, Vec<usize>> = HashMap::new();
        let mut len = 0;

        for (index, page) in trace.into_iter().enumerate() {
            positions.entry(page).or_default().push(index);
            len = index + 1;
        }

        Self { positions, len }
    }

    /// Number of accesses in the indexed trace.
    pub fn trace_len(&self) -> usize {
        self.len
    }

    /// First position strictly after `after` where `page` is referenced.
    pub fn next_use(&self, page: PageId, after: usize) -> Option<usize> {
        let positions = self.positions.get(&page)?;
        let i = positions.partition_point(|&p| p <= after);
        positions.get(i).copied()
    }

    /// Last position strictly before `before` where `page` was referenced.
    pub fn previous_use(&self, page: PageId, before: usize) -> Option<usize> {
        let positions = self.positions.get(&page)?;
        let i = positions.partition_point(|&p| p < before);
        i.checked_sub(1).map(|i| positions[i])
    }
}

impl Replacer for OptimalReplacer {
    fn name(&self) -> &'static str {
        "opt"
    }

    fn select_victim(
        &mut self,
        trace_index: usize,
        frames: &FrameTable,
        _pages: &mut PageTable,
    ) -> Result<FrameId> {
        if trace_index >= self.len {
            return Err(Error::InvariantViolation(format!(
                "access {trace_index} is beyond the {}-access trace indexed for optimal",
                self.len
            )));
        }

        let mut best: Option<((usize, Reverse<Option<usize>>), FrameId)> = None;

        for (frame, page) in frames.iter() {
            let distance = self.next_use(page, trace_index).unwrap_or(usize::MAX);
            let key = (distance, Reverse(self.previous_use(page, trace_index)));

            // Strict greater-than keeps the lowest frame index among ties.
            if best.map_or(true, |(k, _)| key > k) {
                best = Some((key, frame));
            }
        }

        best.map(|(_, frame)| frame).ok_or_else(|| {
            Error::InvariantViolation(
                "optimal asked for a victim with no resident pages".to_string(),
            )
        })
    }
}
