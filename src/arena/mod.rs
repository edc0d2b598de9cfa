//! Arena Module
//!
//! Manual-allocation simulator: hands out cells by handle and knows nothing
//! about strings.
//!
//! ## Responsibilities
//! - Allocate zeroed cells and return fresh handles
//! - Write/read one bit plus a successor link per cell
//! - Free cells, invalidating their handles
//! - Report allocation statistics
//!
//! ## Cell Layout
//! ```text
//! ┌─────────┬───────────────────────────────────────────┐
//! │ Bit (1) │ Next handle (15, text, zero-padded)       │
//! └─────────┴───────────────────────────────────────────┘
//! ```
//! An all-zero link field marks the tail of a chain.

mod allocator;
mod handle;

pub use allocator::Arena;
pub use handle::Handle;

use serde::Serialize;

/// Offset of the bit byte inside a cell
pub const BIT_OFFSET: usize = 0;

/// Offset of the link field inside a cell
pub const LINK_OFFSET: usize = 1;

/// Length of a handle's text encoding
pub const HANDLE_LEN: usize = 15;

/// Number of handles listed in `ArenaStatus::sample_handles`
pub const STATUS_SAMPLE_SIZE: usize = 5;

/// One stored bit, kept in a cell as the character '0' or '1'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn as_byte(self) -> u8 {
        match self {
            Bit::Zero => b'0',
            Bit::One => b'1',
        }
    }

    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Bit::Zero),
            b'1' => Some(Bit::One),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_byte)
    }
}

impl From<bool> for Bit {
    fn from(set: bool) -> Self {
        if set {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

/// Diagnostic snapshot of the arena
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArenaStatus {
    /// Live cells
    pub allocated_blocks: usize,

    /// `allocated_blocks × capacity`, an upper bound on payload
    pub total_bytes: usize,

    /// A few live handles, for eyeballing
    pub sample_handles: Vec<Handle>,
}
