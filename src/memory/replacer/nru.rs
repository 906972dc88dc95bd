//! NRU (Not Recently Used) replacement policy.

use log::debug;

use crate::common::{Error, FrameId, Result};
use crate::memory::replacer::Replacer;
use crate::memory::{FrameTable, PageTable};

/// Not Recently Used eviction.
///
/// Resident pages fall into four classes by `(referenced, dirty)`:
///
/// | class | referenced | dirty |
/// |-------|------------|-------|
/// | 0     | 0          | 0     |
/// | 1     | 0          | 1     |
/// | 2     | 1          | 0     |
/// | 3     | 1          | 1     |
///
/// The victim comes from the lowest non-empty class, lowest frame index
/// first. Every `refresh` accesses all resident pages have their
/// referenced bit cleared.
#[derive(Debug)]
pub struct NruReplacer {
    /// Accesses between reference-bit clears.
    refresh: usize,

    /// Accesses since the last clear.
    since_refresh: usize,
}

impl NruReplacer {
    /// Create an NRU replacer clearing reference bits every `refresh` accesses.
    ///
    /// # Errors
    /// - `Error::InvalidRefresh` if `refresh` is 0
    pub fn new(refresh: usize) -> Result<Self> {
        if refresh == 0 {
            return Err(Error::InvalidRefresh(refresh));
        }
        Ok(Self {
            refresh,
            since_refresh: 0,
        })
    }

    pub fn refresh(&self) -> usize {
        self.refresh
    }

    /// Eviction class of a page: lower classes are evicted first.
    #[inline]
    pub fn class(referenced: bool, dirty: bool) -> u8 {
        (u8::from(referenced) << 1) | u8::from(dirty)
    }
}

impl Replacer for NruReplacer {
    fn name(&self) -> &'static str {
        "nru"
    }

    fn record_access(
        &mut self,
        trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<()> {
        self.since_refresh += 1;
        if self.since_refresh < self.refresh {
            return Ok(());
        }

        self.since_refresh = 0;
        for (_, page) in frames.iter() {
            pages.clear_referenced(page)?;
        }
        debug!(
            "nru refresh after access {}: cleared {} reference bits",
            trace_index,
            frames.len()
        );
        Ok(())
    }

    fn select_victim(
        &mut self,
        _trace_index: usize,
        frames: &FrameTable,
        pages: &mut PageTable,
    ) -> Result<FrameId> {
        let mut best: Option<(u8, FrameId)> = None;

        for (frame, page) in frames.iter() {
            let entry = pages.lookup(page).ok_or(Error::PageNotFound(page))?;
            let class = Self::class(entry.is_referenced(), entry.is_dirty());

            // Strict less-than keeps the lowest frame index among ties.
            if best.map_or(true, |(c, _)| class < c) {
                best = Some((class, frame));
                if class == 0 {
                    break;
                }
            }
        }

        best.map(|(_, frame)| frame).ok_or_else(|| {
            Error::InvariantViolation("nru asked for a victim with no resident pages".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PageId;
    use crate::memory::PageTableEntry;

    /// Fill frames with pages 0..n carrying the given (referenced, dirty) bits.
    fn setup(bits: &[(bool, bool)]) -> (FrameTable, PageTable) {
        let mut frames = FrameTable::new(bits.len()).unwrap();
        let mut pages = PageTable::new();

        for (i, &(r, d)) in bits.iter().enumerate() {
            let page = PageId::new(i as u32);
            pages.insert(PageTableEntry::new(page)).unwrap();
            pages.mark_resident(page, FrameId::new(i)).unwrap();
            if r {
                pages.mark_referenced(page).unwrap();
            }
            if d {
                pages.mark_dirty(page).unwrap();
            }
            frames.occupy(FrameId::new(i), page).unwrap();
        }

        (frames, pages)
    }

    #[test]
    fn test_zero_refresh_rejected() {
        assert!(matches!(NruReplacer::new(0), Err(Error::InvalidRefresh(0))));
    }

    #[test]
    fn test_class_order() {
        assert_eq!(NruReplacer::class(false, false), 0);
        assert_eq!(NruReplacer::class(false, true), 1);
        assert_eq!(NruReplacer::class(true, false), 2);
        assert_eq!(NruReplacer::class(true, true), 3);
    }

    #[test]
    fn test_nru_prefers_lowest_class() {
        let (frames, mut pages) = setup(&[(true, true), (true, false), (false, true)]);
        let mut nru = NruReplacer::new(10).unwrap();

        // (0,1) beats (1,0) and (1,1)
        assert_eq!(nru.select_victim(0, &frames, &mut pages).unwrap(), FrameId::new(2));

        let (frames, mut pages) = setup(&[(true, true), (true, false)]);
        assert_eq!(nru.select_victim(0, &frames, &mut pages).unwrap(), FrameId::new(1));
    }

    #[test]
    fn test_nru_tie_breaks_on_lowest_frame() {
        let (frames, mut pages) = setup(&[(true, true), (false, false), (false, false)]);
        let mut nru = NruReplacer::new(10).unwrap();

        assert_eq!(nru.select_victim(0, &frames, &mut pages).unwrap(), FrameId::new(1));

        let (frames, mut pages) = setup(&[(true, true), (true, true), (true, true)]);
        assert_eq!(nru.select_victim(0, &frames, &mut pages).unwrap(), FrameId::new(0));
    }

    #[test]
    fn test_nru_select_does_not_touch_bits() {
        let (frames, mut pages) = setup(&[(true, false), (true, true)]);
        let mut nru = NruReplacer::new(10).unwrap();

        nru.select_victim(0, &frames, &mut pages).unwrap();
        assert!(pages.lookup(PageId::new(0)).unwrap().is_referenced());
        assert!(pages.lookup(PageId::new(1)).unwrap().is_referenced());
    }

    #[test]
    fn test_nru_refresh_interval() {
        let (frames, mut pages) = setup(&[(true, true), (true, false)]);
        let mut nru = NruReplacer::new(3).unwrap();

        nru.record_access(0, &frames, &mut pages).unwrap();
        nru.record_access(1, &frames, &mut pages).unwrap();
        assert!(pages.lookup(PageId::new(0)).unwrap().is_referenced());

        nru.record_access(2, &frames, &mut pages).unwrap();
        for page in 0..2 {
            let entry = pages.lookup(PageId::new(page)).unwrap();
            assert!(!entry.is_referenced());
        }

        // Dirty bits survive a refresh
        assert!(pages.lookup(PageId::new(0)).unwrap().is_dirty());
    }
}
