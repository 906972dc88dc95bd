//! A single decoded memory access.

use std::fmt;

use crate::common::{Error, PageId, Result};

/// Kind of memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Decode an `R`/`W` token (either case) from trace line `line`.
    ///
    /// # Errors
    /// - `Error::MalformedOperation` for anything else
    pub fn parse(token: &str, line: usize) -> Result<Self> {
        match token {
            "R" | "r" => Ok(Operation::Read),
            "W" | "w" => Ok(Operation::Write),
            _ => Err(Error::MalformedOperation {
                line,
                token: token.to_string(),
            }),
        }
    }

    #[inline]
    pub fn is_write(self) -> bool {
        self == Operation::Write
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("R"),
            Operation::Write => f.write_str("W"),
        }
    }
}

/// One trace record: a 32-bit address and whether it was read or written.
///
/// # Example
/// ```
/// use vmsim::trace::{MemoryAccess, Operation};
/// use vmsim::PageId;
///
/// let access = MemoryAccess::parse_line("0041f7a0 W", 1).unwrap().unwrap();
/// assert_eq!(access.op, Operation::Write);
/// assert_eq!(access.page(), PageId::new(0x41f));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccess {
    pub address: u32,
    pub op: Operation,
}

impl MemoryAccess {
    pub fn new(address: u32, op: Operation) -> Self {
        Self { address, op }
    }

    pub fn read(address: u32) -> Self {
        Self::new(address, Operation::Read)
    }

    pub fn write(address: u32) -> Self {
        Self::new(address, Operation::Write)
    }

    /// Page containing the accessed address.
    #[inline]
    pub fn page(&self) -> PageId {
        PageId::from_address(self.address)
    }

    /// Decode one trace line of the form `<hex address> <R|W>`.
    ///
    /// Returns `Ok(None)` for blank lines. `line` is the 1-based line
    /// number used in error messages.
    ///
    /// # Errors
    /// - `Error::MalformedLine` if the line does not have exactly two fields
    /// - `Error::MalformedAddress` if the address is not 32-bit hex
    /// - `Error::MalformedOperation` if the operation is not R or W
    pub fn parse_line(text: &str, line: usize) -> Result<Option<Self>> {
        let mut fields = text.split_whitespace();

        let (address, op) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => return Ok(None),
            (Some(address), Some(op), None) => (address, op),
            _ => {
                return Err(Error::MalformedLine {
                    line,
                    content: text.to_string(),
                })
            }
        };

        let address = parse_address(address, line)?;
        let op = Operation::parse(op, line)?;

        Ok(Some(Self::new(address, op)))
    }
}

impl fmt::Display for MemoryAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x} {}", self.address, self.op)
    }
}

/// Hex address with optional `0x` prefix, at most 32 bits.
fn parse_address(token: &str, line: usize) -> Result<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    let malformed = || Error::MalformedAddress {
        line,
        token: token.to_string(),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    u32::from_str_radix(digits, 16).map_err(|_| malformed())
}
