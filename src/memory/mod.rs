//! Virtual memory bookkeeping.
//!
//! A fixed set of physical frames holds a subset of the virtual pages a
//! trace touches. On a miss with every frame taken, a replacement policy
//! picks the page to evict.
//!
//! # Components
//! - [`Simulator`] - Drives one access at a time
//! - [`PageTable`] / [`PageTableEntry`] - Per-page valid, dirty, referenced state
//! - [`FrameTable`] - Fixed array of frame slots
//! - [`SimStats`] - Accesses, faults, writebacks
//! - [`replacer`] - Replacement policy implementations

mod frame_table;
mod page_table;
pub mod replacer;
mod simulator;
mod stats;

pub use frame_table::FrameTable;
pub use page_table::{PageTable, PageTableEntry};
pub use simulator::{simulate, AccessAction, AccessOutcome, RunSummary, Simulator};
pub use stats::SimStats;
