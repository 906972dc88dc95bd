//! vmsim - a virtual memory simulator with swappable page replacement policies.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             vmsim                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Trace Input (trace/)                       │   │
//! │  │       "<hex address> <R|W>" → MemoryAccess              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │       Memory (memory/)  [Runtime Swappable Policy]      │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  Replacement: OPT | CLOCK | NRU | RANDOM        │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │      Simulator + PageTable + FrameTable + SimStats      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`memory`] - Page/frame bookkeeping and replacement policies
//! - [`trace`] - Trace decoding
//!
//! # Quick Start
//! ```
//! use vmsim::trace::parse_trace;
//! use vmsim::{simulate, Algorithm, SimConfig};
//!
//! let trace = parse_trace("00001000 R\n00002000 W\n00003000 R\n".as_bytes()).unwrap();
//! let config = SimConfig::new(2, Algorithm::Clock);
//!
//! let summary = simulate(&config, &trace).unwrap();
//! assert_eq!(summary.stats.page_faults, 3);
//! assert_eq!(summary.stats.writebacks, 0);
//! ```

pub mod common;
pub mod memory;
pub mod trace;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Algorithm, Error, FrameId, PageId, Result, SimConfig};

pub use memory::replacer::{ReplacementPolicy, Replacer};
pub use memory::{
    simulate, AccessAction, AccessOutcome, FrameTable, PageTable, PageTableEntry, RunSummary,
    SimStats, Simulator,
};
