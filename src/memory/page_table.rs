//! Page table - per-page residency and status bits.
//!
//! The [`PageTable`] is the single source of truth for a page's state,
//! resident or not. An entry is created on a page's first reference and
//! kept for the rest of the run; eviction only flips it back to invalid.

use std::collections::HashMap;

use crate::common::{Error, FrameId, PageId, Result};

/// Metadata for one virtual page.
///
/// `frame` doubles as the valid bit: a page is resident iff it names
/// the frame holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    /// Which page this entry describes.
    page: PageId,

    /// Frame holding the page, if resident.
    frame: Option<FrameId>,

    /// Written since it was last loaded.
    dirty: bool,

    /// Accessed since the reference bit was last cleared.
    referenced: bool,
}

impl PageTableEntry {
    /// Create an entry for a page that is not yet resident.
    pub fn new(page: PageId) -> Self {
        Self {
            page,
            frame: None,
            dirty: false,
            referenced: false,
        }
    }

    #[inline]
    pub fn page(&self) -> PageId {
        self.page
    }

    #[inline]
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    /// True if the page currently occupies a frame.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.frame.is_some()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_referenced(&self) -> bool {
        self.referenced
    }
}

/// Maps page numbers to their entries.
///
/// Every mutator names the page it touches and fails with
/// `Error::PageNotFound` if that page has never been inserted.
#[derive(Debug, Default)]
pub struct PageTable {
    entries: HashMap<PageId, PageTableEntry>,
}

impl PageTable {
    /// Create an empty page table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a page. `None` means the page has never been referenced.
    pub fn lookup(&self, page: PageId) -> Option<&PageTableEntry> {
        self.entries.get(&page)
    }

    /// Add an entry for a page seen for the first time.
    ///
    /// # Errors
    /// - `Error::DuplicatePage` if the page already has an entry
    pub fn insert(&mut self, entry: PageTableEntry) -> Result<()> {
        if self.entries.contains_key(&entry.page) {
            return Err(Error::DuplicatePage(entry.page));
        }
        self.entries.insert(entry.page, entry);
        Ok(())
    }

    /// Set the dirty bit.
    pub fn mark_dirty(&mut self, page: PageId) -> Result<()> {
        self.entry_mut(page)?.dirty = true;
        Ok(())
    }

    /// Set the referenced bit.
    pub fn mark_referenced(&mut self, page: PageId) -> Result<()> {
        self.entry_mut(page)?.referenced = true;
        Ok(())
    }

    /// Clear the referenced bit.
    pub fn clear_referenced(&mut self, page: PageId) -> Result<()> {
        self.entry_mut(page)?.referenced = false;
        Ok(())
    }

    /// Record that `page` now lives in `frame`.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page has no entry
    /// - `Error::InvariantViolation` if the page is already resident
    pub fn mark_resident(&mut self, page: PageId, frame: FrameId) -> Result<()> {
        let entry = self.entry_mut(page)?;
        if let Some(current) = entry.frame {
            return Err(Error::InvariantViolation(format!(
                "{page} is already resident in {current}"
            )));
        }
        entry.frame = Some(frame);
        Ok(())
    }

    /// Record that `page` was evicted, returning its entry as it was
    /// just before eviction.
    ///
    /// Dirty and referenced bits are reset so a reload starts clean.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page has no entry
    /// - `Error::InvariantViolation` if the page was not resident
    pub fn mark_evicted(&mut self, page: PageId) -> Result<PageTableEntry> {
        let entry = self.entry_mut(page)?;
        if entry.frame.is_none() {
            return Err(Error::InvariantViolation(format!(
                "{page} evicted while not resident"
            )));
        }
        let before = *entry;
        entry.frame = None;
        entry.dirty = false;
        entry.referenced = false;
        Ok(before)
    }

    /// Number of pages ever referenced.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries of resident pages (unordered).
    pub fn resident(&self) -> impl Iterator<Item = &PageTableEntry> {
        self.entries.values().filter(|e| e.is_valid())
    }

    fn entry_mut(&mut self, page: PageId) -> Result<&mut PageTableEntry> {
        self.entries.get_mut(&page).ok_or(Error::PageNotFound(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u32) -> PageId {
        PageId::new(n)
    }

    #[test]
    fn test_lookup_missing() {
        let pt = PageTable::new();
        assert!(pt.lookup(pid(1)).is_none());
        assert!(pt.is_empty());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();

        let entry = pt.lookup(pid(1)).unwrap();
        assert_eq!(entry.page(), pid(1));
        assert!(!entry.is_valid());
        assert!(!entry.is_dirty());
        assert!(!entry.is_referenced());
        assert_eq!(entry.frame(), None);
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();

        let err = pt.insert(PageTableEntry::new(pid(1))).unwrap_err();
        assert!(matches!(err, Error::DuplicatePage(p) if p == pid(1)));
        assert_eq!(pt.len(), 1);
    }

    #[test]
    fn test_mutators_on_missing_page() {
        let mut pt = PageTable::new();
        assert!(matches!(pt.mark_dirty(pid(9)), Err(Error::PageNotFound(_))));
        assert!(matches!(pt.mark_referenced(pid(9)), Err(Error::PageNotFound(_))));
        assert!(matches!(
            pt.mark_resident(pid(9), FrameId::new(0)),
            Err(Error::PageNotFound(_))
        ));
        assert!(matches!(pt.mark_evicted(pid(9)), Err(Error::PageNotFound(_))));
    }

    #[test]
    fn test_resident_lifecycle() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();
        pt.mark_resident(pid(1), FrameId::new(2)).unwrap();
        pt.mark_referenced(pid(1)).unwrap();
        pt.mark_dirty(pid(1)).unwrap();

        let entry = *pt.lookup(pid(1)).unwrap();
        assert!(entry.is_valid());
        assert_eq!(entry.frame(), Some(FrameId::new(2)));
        assert_eq!(pt.resident().count(), 1);

        let before = pt.mark_evicted(pid(1)).unwrap();
        assert!(before.is_dirty());
        assert!(before.is_referenced());
        assert_eq!(before.frame(), Some(FrameId::new(2)));

        // Entry survives eviction, but starts clean.
        let after = pt.lookup(pid(1)).unwrap();
        assert!(!after.is_valid());
        assert!(!after.is_dirty());
        assert!(!after.is_referenced());
        assert_eq!(pt.resident().count(), 0);
        assert_eq!(pt.len(), 1);
    }

    #[test]
    fn test_double_resident_fails() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();
        pt.mark_resident(pid(1), FrameId::new(0)).unwrap();

        let err = pt.mark_resident(pid(1), FrameId::new(1)).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_evict_non_resident_fails() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();

        let err = pt.mark_evicted(pid(1)).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_clear_referenced() {
        let mut pt = PageTable::new();
        pt.insert(PageTableEntry::new(pid(1))).unwrap();
        pt.mark_referenced(pid(1)).unwrap();
        assert!(pt.lookup(pid(1)).unwrap().is_referenced());

        pt.clear_referenced(pid(1)).unwrap();
        assert!(!pt.lookup(pid(1)).unwrap().is_referenced());
    }
}
