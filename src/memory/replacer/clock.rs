//! CLOCK (second chance) replacement policy.

use crate::common::{Error, FrameId, Result};
use crate::memory::replacer::Replacer;
use crate::memory::{FrameTable, PageTable};

/// Second-chance eviction over a circular frame pointer.
///
/// The hand starts at frame 0. On each call it inspects frames in
/// circular order: a referenced page has its bit cleared and is passed
/// over, the first unreferenced page is the victim. The hand is left on
/// the frame after the victim.
///
/// Passing over a page clears its bit, so at most `capacity` frames are
/// passed over before the victim. When every page is referenced the hand
/// inspects `capacity + 1` frames: one full lap, then the frame it
/// started from again, which is now the victim.
#[derive(Debug, Default)]
pub struct ClockReplacer {
    /// Next frame to inspect.
    hand: usize,

    /// Frames passed over during the last `select_victim`.
    last_sweep: usize,
}

impl ClockReplacer {
    /// Create a clock with the hand on frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame the hand currently points at.
    pub fn hand(&self) -> FrameId {
        FrameId::new(self.hand)
    }

    /// How many frames the last victim search passed over.
    ///
    /// The final step onto the victim is not counted, so this is at most
    /// `capacity` even though the hand may have moved once more.
    pub fn last_sweep(&self) -> usize {
        self.last_sweep
    }
}

impl Replacer for ClockReplacer {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn select_victim(
        &mut self,
        _trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<FrameId> {
        let capacity = frames.capacity();
        self.hand %= capacity;
        self.last_sweep = 0;

        // One full lap clears every bit, so the lap after it must stop.
        for _ in 0..=capacity {
            let frame = FrameId::new(self.hand);
            self.hand = (self.hand + 1) % capacity;

            let Some(page) = frames.page_at(frame) else {
                self.last_sweep += 1;
                continue;
            };

            let entry = pages.lookup(page).ok_or(Error::PageNotFound(page))?;
            if !entry.is_referenced() {
                return Ok(frame);
            }

            pages.clear_referenced(page)?;
            self.last_sweep += 1;
        }

        Err(Error::InvariantViolation(
            "clock completed a full sweep without finding a victim".to_string(),
        ))
    }
}
