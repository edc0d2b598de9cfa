//! Chain Module
//!
//! Conversion between stored strings and the bit sequences their chains hold.
//!
//! ## Encoding
//! Each character becomes one 8-bit chunk, most significant bit first, in
//! string order. A chain for a string of length L therefore has 8·L cells:
//! ```text
//! "hi"  →  0110 1000 | 0110 1001
//!          └── 'h' ──┘ └── 'i' ──┘
//! ```
//! Only characters with code points up to 255 fit one chunk.

mod codec;

pub use codec::{
    bits_to_string, decode_bits, encode_bits, find_pattern, parse_pattern, validate_value,
};

/// Bits per encoded character
pub const BITS_PER_CHAR: usize = 8;

/// Largest code point a single chunk can carry
pub const MAX_CODE_POINT: u32 = 0xFF;
