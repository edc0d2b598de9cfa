//! # BitKV
//!
//! A small persistent key-addressable store that keeps every value as a
//! singly linked chain of single-bit cells:
//! - Arena allocator with opaque, generation-checked handles
//! - One 16-byte cell per bit, linked head to tail
//! - Index keyed by each value's first character
//! - Whole-snapshot persistence with two-pass reload
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Storage Engine                          │
//! │        (validate, encode, index, persist, reload)            │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐               ┌─────────────┐
//!         │    Arena    │──serialized──▶│  Snapshot   │
//!         │  (handles)  │               │ (bit_data/) │
//!         └──────┬──────┘               └─────────────┘
//!                │
//!                ▼
//!         ┌─────────────┐
//!         │    Cell     │
//!         │ (16 bytes)  │
//!         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitkv::{Config, Engine};
//!
//! let config = Config::builder().data_dir("./bitkv_data").build();
//! let mut engine = Engine::open(config)?;
//!
//! engine.store("hello")?;
//! assert_eq!(engine.retrieve('h')?, Some("hello".to_string()));
//!
//! engine.close()?;
//! # Ok::<(), bitkv::BitKvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod cell;
pub mod arena;
pub mod chain;
pub mod snapshot;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BitKvError, Result};
pub use config::{Config, OverwritePolicy};
pub use engine::{BitMatch, Engine, EngineStatus};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BitKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
