//! Snapshot record formats
//!
//! Text formats of a single cell file and of one index line.

use crate::arena::{Bit, Handle};
use crate::error::{BitKvError, Result};

/// Contents of one cell file: the bit, then the successor's handle if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRecord {
    pub bit: Bit,
    pub next: Option<Handle>,
}

impl CellRecord {
    pub fn new(bit: Bit, next: Option<Handle>) -> Self {
        Self { bit, next }
    }

    /// `"<bit>\n<next>"`, or just `"<bit>"` for a tail
    pub fn render(&self) -> String {
        match self.next {
            Some(next) => format!("{}\n{}", self.bit.as_char(), next),
            None => self.bit.as_char().to_string(),
        }
    }

    /// Parse a cell file.
    ///
    /// A missing or unparseable second line reads as "no successor"; a bad
    /// or missing bit line is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();

        let bit_line = lines.next().map(str::trim).unwrap_or_default();
        let bit = match bit_line.as_bytes() {
            [byte] => Bit::from_byte(*byte),
            _ => None,
        }
        .ok_or_else(|| BitKvError::Snapshot(format!("bad bit line: {:?}", bit_line)))?;

        let next = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .and_then(|line| line.parse().ok());

        Ok(Self { bit, next })
    }
}

/// One index entry: leading character and the head cell's handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLine {
    pub key: char,
    pub head: Handle,
}

impl IndexLine {
    pub fn new(key: char, head: Handle) -> Self {
        Self { key, head }
    }

    /// `"<char>:<head_handle>"`, without newline
    pub fn render(&self) -> String {
        format!("{}:{}", self.key, self.head)
    }

    /// Parse a line produced by `render`
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || BitKvError::Snapshot(format!("malformed index line: {:?}", line));

        let mut chars = line.chars();
        let key = chars.next().ok_or_else(malformed)?;
        let rest = chars.as_str().strip_prefix(':').ok_or_else(malformed)?;
        let head = rest.trim().parse()?;

        Ok(Self { key, head })
    }
}

/// Whether `c` can key the index; line breaks would split an index line
pub fn is_indexable_key(c: char) -> bool {
    c != '\n' && c != '\r'
}
