//! Frame table - the fixed set of physical frames.
//!
//! Each slot is either empty or names the page it holds. The frame table
//! never touches the [`PageTable`](super::PageTable); the simulator keeps
//! the two consistent.

use crate::common::{Error, FrameId, PageId, Result};

/// Fixed-capacity array of frame slots.
///
/// Frames are handed out in increasing index order during the initial
/// fill: 0, 1, 2, ... After that a frame only becomes free for the
/// instant between a `vacate` and the following `occupy`.
#[derive(Debug)]
pub struct FrameTable {
    /// `slots[i]` is the page held by frame `i`, if any.
    slots: Vec<Option<PageId>>,

    /// Number of occupied slots.
    occupied: usize,
}

impl FrameTable {
    /// Create a table of `capacity` empty frames.
    ///
    /// # Errors
    /// - `Error::InvalidFrameCount` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidFrameCount(capacity));
        }

        Ok(Self {
            slots: vec![None; capacity],
            occupied: 0,
        })
    }

    /// Total number of frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// True when every frame holds a page.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// Lowest-indexed empty frame, or `None` when full.
    pub fn next_free_frame(&self) -> Option<FrameId> {
        self.slots.iter().position(Option::is_none).map(FrameId::new)
    }

    /// Page held by `frame`, if any (out-of-range frames hold nothing).
    pub fn page_at(&self, frame: FrameId) -> Option<PageId> {
        self.slots.get(frame.index()).copied().flatten()
    }

    /// Assign `page` to `frame`.
    ///
    /// Re-occupying a frame with the page it already holds is a no-op.
    ///
    /// # Errors
    /// - `Error::FrameOutOfRange` if `frame` is past the capacity
    /// - `Error::FrameOccupied` if the frame holds a different page
    pub fn occupy(&mut self, frame: FrameId, page: PageId) -> Result<()> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(frame.index())
            .ok_or(Error::FrameOutOfRange { frame, capacity })?;

        match *slot {
            Some(resident) if resident == page => Ok(()),
            Some(resident) => Err(Error::FrameOccupied { frame, resident }),
            None => {
                *slot = Some(page);
                self.occupied += 1;
                Ok(())
            }
        }
    }

    /// Clear `frame`, returning the page it held.
    ///
    /// # Errors
    /// - `Error::FrameOutOfRange` if `frame` is past the capacity
    /// - `Error::FrameEmpty` if the frame holds nothing
    pub fn vacate(&mut self, frame: FrameId) -> Result<PageId> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(frame.index())
            .ok_or(Error::FrameOutOfRange { frame, capacity })?;

        let page = slot.take().ok_or(Error::FrameEmpty(frame))?;
        self.occupied -= 1;
        Ok(page)
    }

    /// Occupied frames and their pages, in frame index order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, PageId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|page| (FrameId::new(i), page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fid(n: usize) -> FrameId {
        FrameId::new(n)
    }

    fn pid(n: u32) -> PageId {
        PageId::new(n)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            FrameTable::new(0),
            Err(Error::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn test_initial_fill_order() {
        let mut ft = FrameTable::new(3).unwrap();
        assert!(ft.is_empty());

        for n in 0..3 {
            let frame = ft.next_free_frame().unwrap();
            assert_eq!(frame, fid(n));
            ft.occupy(frame, pid(n as u32 + 10)).unwrap();
        }

        assert!(ft.is_full());
        assert_eq!(ft.len(), 3);
        assert_eq!(ft.next_free_frame(), None);
    }

    #[test]
    fn test_occupy_taken_frame_fails() {
        let mut ft = FrameTable::new(2).unwrap();
        ft.occupy(fid(0), pid(1)).unwrap();

        // Same page again is fine
        ft.occupy(fid(0), pid(1)).unwrap();
        assert_eq!(ft.len(), 1);

        let err = ft.occupy(fid(0), pid(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::FrameOccupied { frame, resident } if frame == fid(0) && resident == pid(1)
        ));
    }

    #[test]
    fn test_vacate() {
        let mut ft = FrameTable::new(2).unwrap();
        ft.occupy(fid(0), pid(1)).unwrap();
        ft.occupy(fid(1), pid(2)).unwrap();

        assert_eq!(ft.vacate(fid(0)).unwrap(), pid(1));
        assert!(!ft.is_full());
        assert_eq!(ft.next_free_frame(), Some(fid(0)));
        assert_eq!(ft.page_at(fid(0)), None);

        assert!(matches!(ft.vacate(fid(0)), Err(Error::FrameEmpty(_))));
    }

    #[test]
    fn test_out_of_range() {
        let mut ft = FrameTable::new(2).unwrap();
        assert!(matches!(
            ft.occupy(fid(5), pid(1)),
            Err(Error::FrameOutOfRange { capacity: 2, .. })
        ));
        assert!(matches!(
            ft.vacate(fid(5)),
            Err(Error::FrameOutOfRange { .. })
        ));
        assert_eq!(ft.page_at(fid(5)), None);
    }

    #[test]
    fn test_iter_in_frame_order() {
        let mut ft = FrameTable::new(3).unwrap();
        ft.occupy(fid(2), pid(30)).unwrap();
        ft.occupy(fid(0), pid(10)).unwrap();

        let resident: Vec<_> = ft.iter().collect();
        assert_eq!(resident, vec![(fid(0), pid(10)), (fid(2), pid(30))]);
    }
}
