//! Trace input.
//!
//! A trace is a text file with one access per line:
//! ```text
//! 0041f7a0 R
//! 13f5e2c0 W
//! ```
//!
//! - [`MemoryAccess`] / [`Operation`] - one decoded record
//! - [`read_trace`] / [`parse_trace`] - whole-trace decoding

mod access;
mod reader;

pub use access::{MemoryAccess, Operation};
pub use reader::{parse_trace, read_trace};
