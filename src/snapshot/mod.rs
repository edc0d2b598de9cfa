//! Snapshot Module
//!
//! Whole-state persistence: every chain reachable from the index is written
//! out cell by cell, and rebuilt into a fresh arena on startup.
//!
//! ## Responsibilities
//! - Wipe and rewrite the snapshot after every mutation
//! - Reload the index and its chains with two passes (allocate, then link)
//! - Report on-disk usage
//!
//! ## Directory Layout
//! ```text
//! {data_dir}/
//!   ├── index.txt              "<char>:<head_handle>" per line
//!   └── bit_data/
//!         ├── 000000000000000  "<bit>\n<next_handle>"
//!         ├── 000000010000000  "<bit>\n<next_handle>"
//!         └── 000000020000000  "<bit>"   (tail)
//! ```
//!
//! The rewrite is destructive: a crash halfway through leaves a partial
//! snapshot behind.

mod loader;
mod record;
mod writer;

pub use loader::{LoadResult, SnapshotLoader};
pub use record::{is_indexable_key, CellRecord, IndexLine};
pub use writer::{SaveResult, SnapshotWriter};

use serde::Serialize;

/// Directory (under the data dir) holding one file per persisted cell
pub const CELLS_DIR: &str = "bit_data";

/// Index file name (under the data dir)
pub const INDEX_FILENAME: &str = "index.txt";

/// On-disk footprint of the cell files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiskStatus {
    /// Number of cell files
    pub files: usize,

    /// Sum of their sizes
    pub total_bytes: u64,
}
