//! Snapshot Writer
//!
//! Wipes the snapshot directory and writes the current index and chains.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::arena::{Arena, Handle};
use crate::error::Result;

use super::{CellRecord, DiskStatus, IndexLine};

/// Outcome of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveResult {
    /// Index lines written
    pub entries_written: usize,

    /// Cell files written
    pub cells_written: usize,
}

/// Writes full snapshots into a fixed cells directory and index file
pub struct SnapshotWriter {
    cells_dir: PathBuf,
    index_path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(cells_dir: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            cells_dir: cells_dir.into(),
            index_path: index_path.into(),
        }
    }

    /// Replace the on-disk snapshot with `index` and the chains it reaches
    ///
    /// Steps:
    /// 1. Delete every file in the cells directory
    /// 2. Walk each chain, one file per cell named by its handle
    /// 3. Rewrite the index file
    pub fn save(&self, arena: &Arena, index: &BTreeMap<char, Handle>) -> Result<SaveResult> {
        fs::create_dir_all(&self.cells_dir)?;
        self.clear_cells()?;

        let mut cells_written = 0;
        for &head in index.values() {
            let mut current = Some(head);
            while let Some(handle) = current {
                let (bit, next) = arena.read(handle)?;
                let record = CellRecord::new(bit, next);
                fs::write(self.cells_dir.join(handle.to_string()), record.render())?;
                cells_written += 1;
                current = next;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.index_path)?);
        for (&key, &head) in index {
            writeln!(writer, "{}", IndexLine::new(key, head).render())?;
        }
        writer.flush()?;

        Ok(SaveResult {
            entries_written: index.len(),
            cells_written,
        })
    }

    /// Count and size the cell files
    pub fn disk_status(&self) -> Result<DiskStatus> {
        let mut status = DiskStatus::default();
        if !self.cells_dir.exists() {
            return Ok(status);
        }

        for entry in fs::read_dir(&self.cells_dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                status.files += 1;
                status.total_bytes += metadata.len();
            }
        }
        Ok(status)
    }

    pub fn cells_dir(&self) -> &Path {
        &self.cells_dir
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn clear_cells(&self) -> Result<()> {
        for entry in fs::read_dir(&self.cells_dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
