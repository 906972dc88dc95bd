//! Trace file reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::common::{Error, Result};
use crate::trace::MemoryAccess;

/// Decode every line of `reader` into accesses.
///
/// The whole trace is buffered: the optimal policy needs to see all of
/// it before the first access is simulated. The first malformed line
/// aborts the read. Lines are split on `\n` as raw bytes, so a line that
/// is not UTF-8 is reported as malformed with its line number.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<MemoryAccess>> {
    let mut trace = Vec::new();

    for (i, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line = i + 1;
        let bytes = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);

        let text = std::str::from_utf8(bytes).map_err(|_| Error::MalformedLine {
            line,
            content: String::from_utf8_lossy(bytes).into_owned(),
        })?;

        if let Some(access) = MemoryAccess::parse_line(text, line)? {
            trace.push(access);
        }
    }

    Ok(trace)
}

/// Read and decode a trace file.
///
/// # Errors
/// - `Error::TraceFile` if the file cannot be opened or read
/// - Any input format error from [`MemoryAccess::parse_line`]
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<MemoryAccess>> {
    let path = path.as_ref();
    let with_path = |source| Error::TraceFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(with_path)?;
    let trace = parse_trace(BufReader::new(file)).map_err(|e| match e {
        Error::Io(source) => with_path(source),
        other => other,
    })?;

    debug!("read {} accesses from {}", trace.len(), path.display());
    Ok(trace)
}
