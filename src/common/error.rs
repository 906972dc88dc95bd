//! Error types for the simulator.

use std::path::PathBuf;

use thiserror::Error;

use crate::common::{FrameId, PageId};

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in the simulator.
///
/// Three families, all fatal for a run:
/// - configuration errors, raised before any access is processed
/// - input format errors, raised while decoding the trace
/// - bookkeeping errors, which mean the page table and frame table
///   disagree and indicate a bug rather than bad input
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a trace file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Trace file could not be opened or read.
    #[error("cannot read trace {}: {source}", .path.display())]
    TraceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------
    /// Frame count must be positive.
    #[error("invalid frame count {0}: need at least one frame")]
    InvalidFrameCount(usize),

    /// Algorithm name not one of opt, clock, nru, rand.
    #[error("unknown algorithm {0:?}: expected one of opt, clock, nru, rand")]
    UnknownAlgorithm(String),

    /// NRU was selected without a refresh interval.
    #[error("nru requires a refresh interval")]
    MissingRefresh,

    /// Refresh interval must be positive.
    #[error("invalid refresh interval {0}: must be at least 1")]
    InvalidRefresh(usize),

    // ------------------------------------------------------------------
    // Trace input
    // ------------------------------------------------------------------
    /// Line does not have the `<address> <R|W>` shape.
    #[error("line {line}: expected \"<hex address> <R|W>\", got {content:?}")]
    MalformedLine { line: usize, content: String },

    /// Address token is not a 32-bit hex number.
    #[error("line {line}: malformed address {token:?}")]
    MalformedAddress { line: usize, token: String },

    /// Operation token is not R or W.
    #[error("line {line}: malformed operation {token:?}, expected R or W")]
    MalformedOperation { line: usize, token: String },

    // ------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------
    /// Attempted to insert a second entry for the same page.
    #[error("{0} already has a page table entry")]
    DuplicatePage(PageId),

    /// Page has never been referenced.
    #[error("{0} has no page table entry")]
    PageNotFound(PageId),

    /// Frame already holds a different page.
    #[error("{frame} already holds {resident}")]
    FrameOccupied { frame: FrameId, resident: PageId },

    /// Frame holds no page.
    #[error("{0} is empty")]
    FrameEmpty(FrameId),

    /// Frame index beyond the table's capacity.
    #[error("{frame} is out of range for {capacity} frames")]
    FrameOutOfRange { frame: FrameId, capacity: usize },

    /// Residency bookkeeping went inconsistent.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// True for errors reported before any access is processed.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFrameCount(_)
                | Error::UnknownAlgorithm(_)
                | Error::MissingRefresh
                | Error::InvalidRefresh(_)
        )
    }

    /// True for trace decoding errors.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedLine { .. }
                | Error::MalformedAddress { .. }
                | Error::MalformedOperation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(PageId::new(0x42));
        assert_eq!(format!("{}", err), "Page(0x00042) has no page table entry");

        let err = Error::FrameEmpty(FrameId::new(3));
        assert_eq!(format!("{}", err), "Frame(3) is empty");

        let err = Error::MalformedOperation {
            line: 7,
            token: "X".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "line 7: malformed operation \"X\", expected R or W"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_trace_file_error_names_path() {
        let err = Error::TraceFile {
            path: PathBuf::from("traces/gcc.trace"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert_eq!(format!("{}", err), "cannot read trace traces/gcc.trace: not found");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_error_families() {
        assert!(Error::InvalidFrameCount(0).is_config_error());
        assert!(Error::MissingRefresh.is_config_error());
        assert!(!Error::MissingRefresh.is_input_error());

        let err = Error::MalformedAddress {
            line: 1,
            token: "zz".to_string(),
        };
        assert!(err.is_input_error());
        assert!(!err.is_config_error());

        assert!(!Error::DuplicatePage(PageId::new(1)).is_config_error());
        assert!(!Error::DuplicatePage(PageId::new(1)).is_input_error());
    }
}
