//! Chain codec
//!
//! Encoding and decoding functions between strings and bit sequences.

use crate::arena::Bit;
use crate::error::{BitKvError, Result};

use super::{BITS_PER_CHAR, MAX_CODE_POINT};

/// Check that `value` can be stored: non-empty, at most `max_len`
/// characters, every character within one 8-bit chunk
pub fn validate_value(value: &str, max_len: usize) -> Result<()> {
    if value.is_empty() {
        return Err(BitKvError::Validation(
            "cannot store an empty string".to_string(),
        ));
    }

    let len = value.chars().count();
    if len > max_len {
        return Err(BitKvError::Validation(format!(
            "value is {} characters long, limit is {}",
            len, max_len
        )));
    }

    if let Some(c) = value.chars().find(|&c| c as u32 > MAX_CODE_POINT) {
        return Err(BitKvError::Validation(format!(
            "character {:?} (U+{:04X}) does not fit in {} bits",
            c, c as u32, BITS_PER_CHAR
        )));
    }

    Ok(())
}

/// Flatten `value` into bits, MSB first per character.
///
/// Callers validate first; code points above 255 keep only their low byte.
pub fn encode_bits(value: &str) -> Vec<Bit> {
    let mut bits = Vec::with_capacity(value.len() * BITS_PER_CHAR);
    for c in value.chars() {
        let code = c as u32;
        for shift in (0..BITS_PER_CHAR).rev() {
            bits.push(Bit::from((code >> shift) & 1 == 1));
        }
    }
    bits
}

/// Regroup bits into 8-bit chunks and decode each as a code point.
///
/// A trailing chunk shorter than 8 bits is dropped.
pub fn decode_bits(bits: &[Bit]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|chunk| {
            let code = chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | (bit == Bit::One) as u8);
            char::from(code)
        })
        .collect()
}

/// Render bits as a '0'/'1' string
pub fn bits_to_string(bits: &[Bit]) -> String {
    bits.iter().map(|bit| bit.as_char()).collect()
}

/// Parse a '0'/'1' search pattern
pub fn parse_pattern(pattern: &str) -> Result<Vec<Bit>> {
    if pattern.is_empty() {
        return Err(BitKvError::Validation(
            "bit pattern is empty".to_string(),
        ));
    }

    pattern
        .chars()
        .map(|c| {
            Bit::from_char(c).ok_or_else(|| {
                BitKvError::Validation(format!(
                    "bit pattern {:?} contains {:?}, only '0' and '1' allowed",
                    pattern, c
                ))
            })
        })
        .collect()
}

/// Every start offset where `pattern` occurs in `haystack`, overlaps included
pub fn find_pattern(haystack: &[Bit], pattern: &[Bit]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return Vec::new();
    }

    haystack
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(offset, _)| offset)
        .collect()
}
