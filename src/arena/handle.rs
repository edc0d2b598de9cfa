//! Cell handles
//!
//! A handle names one slot of the arena at one generation. Its text form is
//! exactly [`HANDLE_LEN`] lowercase hex digits: 8 for the slot followed by 7
//! for the generation. That text is what ends up in link fields and snapshot
//! file names.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::BitKvError;

use super::HANDLE_LEN;

const SLOT_DIGITS: usize = 8;

/// Largest generation that fits 7 hex digits; the arena retires a slot that reaches it
pub(crate) const GENERATION_MASK: u32 = 0x0FFF_FFFF;

/// Opaque identifier of an allocated cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self {
            slot,
            generation: generation & GENERATION_MASK,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    /// Fixed-width text encoding, as stored in link fields
    pub fn encode(&self) -> [u8; HANDLE_LEN] {
        let mut out = [0u8; HANDLE_LEN];
        out.copy_from_slice(self.to_string().as_bytes());
        out
    }

    /// Decode a link field; zero padding is stripped first.
    ///
    /// Returns `None` for the all-zero terminal marker or anything that does
    /// not parse as a handle.
    pub fn decode_link(field: &[u8]) -> Option<Self> {
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        let text = std::str::from_utf8(&field[..end]).ok()?;
        if text.is_empty() {
            return None;
        }
        text.parse().ok()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}{:07x}", self.slot, self.generation)
    }
}

impl FromStr for Handle {
    type Err = BitKvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BitKvError::Snapshot(format!("invalid handle: {:?}", s));

        if s.len() != HANDLE_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let slot = u32::from_str_radix(&s[..SLOT_DIGITS], 16).map_err(|_| invalid())?;
        let generation = u32::from_str_radix(&s[SLOT_DIGITS..], 16).map_err(|_| invalid())?;
        Ok(Self::new(slot, generation))
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
