//! Error types for BitKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::arena::Handle;

/// Result type alias using BitKvError
pub type Result<T> = std::result::Result<T, BitKvError>;

/// Unified error type for BitKV operations
#[derive(Debug, Error)]
pub enum BitKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Arena / Cell Errors
    // -------------------------------------------------------------------------
    #[error("Cell not found: {0}")]
    NotFound(Handle),

    #[error("Out of bounds: offset {offset} + len {len} exceeds cell capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("Corrupt cell {handle}: bit byte {byte:#04x} is neither '0' nor '1'")]
    CorruptCell { handle: Handle, byte: u8 },

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
