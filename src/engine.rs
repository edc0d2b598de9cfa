//! Engine Module
//!
//! The storage engine that turns strings into bit chains and keeps them on disk.
//!
//! ## Responsibilities
//! - Validate and encode values into one arena cell per bit
//! - Maintain the character-keyed index of chain heads
//! - Rewrite the snapshot after every mutation
//! - Rebuild index and chains from the snapshot on startup

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::arena::{Arena, ArenaStatus, Bit, Handle};
use crate::chain;
use crate::config::{Config, OverwritePolicy};
use crate::error::{BitKvError, Result};
use crate::snapshot::{self, DiskStatus, SnapshotLoader, SnapshotWriter};

/// Structured statistics returned by [`Engine::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    /// Index entries
    pub entries: usize,

    /// Arena allocation statistics
    pub in_memory: ArenaStatus,

    /// Cell files in the snapshot directory
    pub on_disk: DiskStatus,
}

/// One entry whose bits contain a searched pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitMatch {
    /// Index key of the entry
    pub key: char,

    /// Stored value
    pub value: String,

    /// Full bit string of the value
    pub bits: String,

    /// Start offsets of every occurrence, overlaps included
    pub offsets: Vec<usize>,
}

/// The main storage engine
///
/// ## Lifecycle
/// - `open`: create directories, reload any persisted snapshot
/// - `store` / `retrieve` / `delete` / `list_entries` / `status`
/// - `close`: persist once more and consume the engine
///
/// Single-threaded: every mutating call takes `&mut self` and finishes its
/// snapshot rewrite before returning.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Cell storage
    arena: Arena,

    /// Leading character → head cell
    index: BTreeMap<char, Handle>,

    /// Snapshot destination
    writer: SnapshotWriter,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Open/create data directory and cells directory
    /// 3. Reload index and chains if an index file exists
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let cells_dir = config.data_dir.join(snapshot::CELLS_DIR);
        let index_path = config.data_dir.join(snapshot::INDEX_FILENAME);
        fs::create_dir_all(&cells_dir)?;

        let mut arena = Arena::new(config.cell_capacity);
        let (index, loaded) = SnapshotLoader::load(&cells_dir, &index_path, &mut arena)?;

        if loaded.entries_loaded > 0 || loaded.entries_skipped > 0 {
            info!(
                entries = loaded.entries_loaded,
                skipped = loaded.entries_skipped,
                cells = loaded.cells_loaded,
                "snapshot reloaded"
            );
        }

        Ok(Self {
            config,
            arena,
            index,
            writer: SnapshotWriter::new(cells_dir, index_path),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Store a value under its first character
    ///
    /// Steps:
    /// 1. Validate (non-empty, length limit, 8-bit characters)
    /// 2. Allocate one cell per bit and link them in order
    /// 3. Point the index at the head, replacing any previous entry
    /// 4. Persist the snapshot
    pub fn store(&mut self, value: &str) -> Result<()> {
        let key = self.validate(value)?;

        let bits = chain::encode_bits(value);
        let handles: Vec<Handle> = bits.iter().map(|_| self.arena.allocate()).collect();
        for (position, (&bit, &handle)) in bits.iter().zip(&handles).enumerate() {
            self.arena.write(bit, handle, handles.get(position + 1).copied())?;
        }

        let head = handles[0];
        if let Some(previous) = self.index.insert(key, head) {
            match self.config.overwrite_policy {
                OverwritePolicy::Orphan => {
                    debug!(key = %key, "previous chain orphaned");
                }
                OverwritePolicy::Reclaim => {
                    let freed = self.free_chain(previous);
                    debug!(key = %key, freed, "previous chain reclaimed");
                }
            }
        }

        debug!(key = %key, cells = handles.len(), head = %head, "stored");
        self.persist()
    }

    /// Reconstruct the value stored under `key`; `None` if absent
    pub fn retrieve(&self, key: char) -> Result<Option<String>> {
        match self.index.get(&key) {
            Some(&head) => Ok(Some(chain::decode_bits(&self.walk_bits(head)?))),
            None => Ok(None),
        }
    }

    /// Raw '0'/'1' string of the chain under `key`; `None` if absent
    pub fn bits_of(&self, key: char) -> Result<Option<String>> {
        match self.index.get(&key) {
            Some(&head) => Ok(Some(chain::bits_to_string(&self.walk_bits(head)?))),
            None => Ok(None),
        }
    }

    /// Free the chain under `key` and drop the entry
    ///
    /// Returns false (and touches nothing) when `key` is absent. A read fault
    /// partway down the chain ends the walk; cells past it stay allocated.
    pub fn delete(&mut self, key: char) -> Result<bool> {
        let Some(head) = self.index.remove(&key) else {
            return Ok(false);
        };

        let freed = self.free_chain(head);
        debug!(key = %key, freed, "deleted");

        self.persist()?;
        Ok(true)
    }

    /// Current index keys, in ascending order
    pub fn list_entries(&self) -> Vec<char> {
        self.index.keys().copied().collect()
    }

    /// Entry count, arena statistics and on-disk usage
    pub fn status(&self) -> Result<EngineStatus> {
        Ok(EngineStatus {
            entries: self.index.len(),
            in_memory: self.arena.status(),
            on_disk: self.writer.disk_status()?,
        })
    }

    /// Find every entry whose bits contain `pattern` (a '0'/'1' string)
    pub fn search_bits(&self, pattern: &str) -> Result<Vec<BitMatch>> {
        let pattern = chain::parse_pattern(pattern)?;

        let mut matches = Vec::new();
        for (&key, &head) in &self.index {
            let bits = self.walk_bits(head)?;
            let offsets = chain::find_pattern(&bits, &pattern);
            if offsets.is_empty() {
                continue;
            }
            matches.push(BitMatch {
                key,
                value: chain::decode_bits(&bits),
                bits: chain::bits_to_string(&bits),
                offsets,
            });
        }
        Ok(matches)
    }

    /// Persist the snapshot now
    pub fn sync(&self) -> Result<()> {
        self.persist()
    }

    /// Close the engine gracefully
    ///
    /// Writes a final snapshot
    pub fn close(self) -> Result<()> {
        self.persist()?;
        info!(entries = self.index.len(), "engine closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the directory holding cell files
    pub fn cells_dir(&self) -> &Path {
        self.writer.cells_dir()
    }

    /// Get the index file path
    pub fn index_path(&self) -> PathBuf {
        self.writer.index_path().to_path_buf()
    }

    /// Get the number of index entries
    pub fn entry_count(&self) -> usize {
        self.index.len()
    }

    /// Get the arena
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Validate `value` and return its index key
    fn validate(&self, value: &str) -> Result<char> {
        chain::validate_value(value, self.config.max_value_len)?;

        let key = value
            .chars()
            .next()
            .ok_or_else(|| BitKvError::Validation("cannot store an empty string".to_string()))?;
        if !snapshot::is_indexable_key(key) {
            return Err(BitKvError::Validation(format!(
                "{:?} cannot start a value",
                key
            )));
        }
        Ok(key)
    }

    /// Collect bits from `head` to the terminal link
    fn walk_bits(&self, head: Handle) -> Result<Vec<Bit>> {
        let mut bits = Vec::new();
        let mut current = Some(head);
        while let Some(handle) = current {
            let (bit, next) = self.arena.read(handle)?;
            bits.push(bit);
            current = next;
        }
        Ok(bits)
    }

    /// Free every cell reachable from `head`, stopping at the first read fault
    fn free_chain(&mut self, head: Handle) -> usize {
        let mut visited = Vec::new();
        let mut current = Some(head);
        while let Some(handle) = current {
            visited.push(handle);
            match self.arena.read(handle) {
                Ok((_, next)) => current = next,
                Err(e) => {
                    warn!(handle = %handle, error = %e, "chain walk stopped early");
                    break;
                }
            }
        }

        visited
            .into_iter()
            .filter(|&handle| self.arena.free(handle))
            .count()
    }

    fn persist(&self) -> Result<()> {
        let saved = self.writer.save(&self.arena, &self.index)?;
        debug!(
            entries = saved.entries_written,
            cells = saved.cells_written,
            "snapshot written"
        );
        Ok(())
    }
}
