//! Configuration for BitKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::arena::{HANDLE_LEN, LINK_OFFSET};
use crate::error::{BitKvError, Result};

/// Default cell capacity in bytes (1 bit byte + 15 link bytes)
pub const DEFAULT_CELL_CAPACITY: usize = 16;

/// Default maximum stored value length, in characters
pub const DEFAULT_MAX_VALUE_LEN: usize = 255;

/// Main configuration for a BitKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the snapshot
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── index.txt        (one "<char>:<head_handle>" line per entry)
    ///     └── bit_data/        (one file per persisted cell)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Arena Configuration
    // -------------------------------------------------------------------------
    /// Size of every cell in bytes
    pub cell_capacity: usize,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// Longest value (in characters) accepted by `store`
    pub max_value_len: usize,

    /// What happens to the old chain when a store reuses a leading character
    pub overwrite_policy: OverwritePolicy,
}

/// Fate of a chain whose index entry is replaced by a new store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Leave the old chain allocated and unreachable
    #[default]
    Orphan,

    /// Free every cell of the old chain when the new head replaces it
    Reclaim,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./bitkv_data"),
            cell_capacity: DEFAULT_CELL_CAPACITY,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            overwrite_policy: OverwritePolicy::Orphan,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can actually back an engine
    pub fn validate(&self) -> Result<()> {
        if self.cell_capacity < LINK_OFFSET + HANDLE_LEN {
            return Err(BitKvError::Config(format!(
                "cell_capacity {} too small, need at least {}",
                self.cell_capacity,
                LINK_OFFSET + HANDLE_LEN
            )));
        }
        if self.max_value_len == 0 {
            return Err(BitKvError::Config(
                "max_value_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for the snapshot)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the cell capacity (in bytes)
    pub fn cell_capacity(mut self, bytes: usize) -> Self {
        self.config.cell_capacity = bytes;
        self
    }

    /// Set the maximum value length (in characters)
    pub fn max_value_len(mut self, len: usize) -> Self {
        self.config.max_value_len = len;
        self
    }

    /// Set the overwrite policy
    pub fn overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.config.overwrite_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
