//! Cell
//!
//! Fixed-capacity byte buffer, the smallest unit the arena hands out.

use crate::error::{BitKvError, Result};

/// A zero-initialized, fixed-size block of bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    bytes: Box<[u8]>,
}

impl Cell {
    /// Create a zeroed cell of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Cell size in bytes
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Copy `data` into the cell starting at `offset`
    pub fn write(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let end = self.checked_end(offset, data.len())?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Borrow `length` bytes starting at `offset`
    pub fn read(&self, offset: usize, length: usize) -> Result<&[u8]> {
        let end = self.checked_end(offset, length)?;
        Ok(&self.bytes[offset..end])
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(end),
            _ => Err(BitKvError::OutOfBounds {
                offset,
                len,
                capacity: self.bytes.len(),
            }),
        }
    }
}
