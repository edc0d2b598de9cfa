//! Snapshot Loader
//!
//! Rebuilds the index and every chain into an empty arena.
//!
//! Recorded handles are only file names; the arena hands out new ones.
//! Since a link may only name a cell that already exists, each chain is
//! rebuilt in two passes:
//!
//! 1. **Allocate**: follow the recorded links from the head file, allocate a
//!    fresh cell per file and write its bit with no link, remembering
//!    `recorded -> fresh`.
//! 2. **Link**: rewrite every fresh cell with its bit and the fresh handle of
//!    its recorded successor (terminal when the successor was never loaded).

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::arena::{Arena, Handle};
use crate::error::Result;

use super::{CellRecord, IndexLine};

/// Result of a load operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadResult {
    /// Index entries restored
    pub entries_loaded: usize,

    /// Index entries dropped because their head cell file was missing or unreadable
    pub entries_skipped: usize,

    /// Cells allocated into the arena
    pub cells_loaded: usize,
}

/// Reconstructs a snapshot into an arena
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load the snapshot at (`cells_dir`, `index_path`) into `arena`
    ///
    /// A missing index file means an empty store. A chain ends early at the
    /// first missing or unreadable cell file, or at a handle it already
    /// visited.
    pub fn load(
        cells_dir: &Path,
        index_path: &Path,
        arena: &mut Arena,
    ) -> Result<(BTreeMap<char, Handle>, LoadResult)> {
        let mut index = BTreeMap::new();
        let mut result = LoadResult::default();

        let text = match fs::read_to_string(index_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((index, result)),
            Err(e) => return Err(e.into()),
        };

        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let IndexLine { key, head } = IndexLine::parse(line)?;

            let chain = Self::allocate_pass(cells_dir, head, arena)?;
            let Some(&(_, fresh_head, _)) = chain.first() else {
                warn!(key = %key, head = %head, "head cell missing from snapshot, dropping entry");
                result.entries_skipped += 1;
                continue;
            };
            Self::link_pass(&chain, arena)?;

            debug!(key = %key, cells = chain.len(), "chain reloaded");
            result.cells_loaded += chain.len();
            result.entries_loaded += 1;
            index.insert(key, fresh_head);
        }

        Ok((index, result))
    }

    /// Allocate one bit-only cell per reachable file, in chain order
    fn allocate_pass(
        cells_dir: &Path,
        head: Handle,
        arena: &mut Arena,
    ) -> Result<Vec<(Handle, Handle, CellRecord)>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(head);

        while let Some(recorded) = current {
            if !seen.insert(recorded) {
                warn!(handle = %recorded, "cycle in snapshot links, truncating chain");
                break;
            }
            let Some(record) = Self::read_record(cells_dir, recorded)? else {
                break;
            };

            let fresh = arena.allocate();
            arena.write(record.bit, fresh, None)?;
            chain.push((recorded, fresh, record));
            current = record.next;
        }

        Ok(chain)
    }

    /// Link each fresh cell to the fresh cell allocated right after it
    fn link_pass(chain: &[(Handle, Handle, CellRecord)], arena: &mut Arena) -> Result<()> {
        for (position, (_, fresh, record)) in chain.iter().enumerate() {
            let next = chain
                .get(position + 1)
                .filter(|(recorded_next, _, _)| record.next == Some(*recorded_next))
                .map(|(_, fresh_next, _)| *fresh_next);
            arena.write(record.bit, *fresh, next)?;
        }
        Ok(())
    }

    /// Read one cell file; `None` when it is missing or does not parse
    fn read_record(cells_dir: &Path, recorded: Handle) -> Result<Option<CellRecord>> {
        let path = cells_dir.join(recorded.to_string());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(handle = %recorded, "cell file missing, chain ends here");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match CellRecord::parse(&text) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(handle = %recorded, error = %e, "unreadable cell file, chain ends here");
                Ok(None)
            }
        }
    }
}
