//! Virtual page number type.

use std::fmt;

use crate::common::config::PAGE_SHIFT;

/// Identifies a virtual page.
///
/// With 32-bit addresses and 4KB pages the page number is the upper
/// 20 bits of the address, so it always fits in a `u32`.
///
/// There is no sentinel value: "no page" is always `Option<PageId>`.
///
/// # Example
/// ```
/// use vmsim::PageId;
///
/// let page_id = PageId::from_address(0x0041_f7a0);
/// assert_eq!(page_id, PageId::new(0x41f));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Create a new PageId from a raw page number.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// The page containing `address` (offset bits discarded).
    #[inline]
    pub fn from_address(address: u32) -> Self {
        PageId(address >> PAGE_SHIFT)
    }

    /// First byte address of this page.
    #[inline]
    pub fn base_address(self) -> u32 {
        self.0 << PAGE_SHIFT
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({:#07x})", self.0)
    }
}
