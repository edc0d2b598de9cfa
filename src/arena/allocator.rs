//! Arena allocator
//!
//! Slot map with a free list. Freed slots are recycled under a new
//! generation, so a stale handle never reaches someone else's cell. A slot
//! whose generation has reached the 7-digit maximum is retired instead of
//! recycled, which keeps every handle unique for the arena's lifetime.

use crate::cell::Cell;
use crate::error::{BitKvError, Result};

use super::handle::GENERATION_MASK;
use super::{ArenaStatus, Bit, Handle, BIT_OFFSET, LINK_OFFSET, STATUS_SAMPLE_SIZE};

struct Slot {
    generation: u32,
    cell: Option<Cell>,
}

/// Owner of every cell; all access goes through handles
pub struct Arena {
    /// Size of each cell in bytes
    capacity: usize,
    /// Slot storage, indexed by `Handle::slot`
    slots: Vec<Slot>,
    /// Vacant slot indices, reused LIFO
    free_slots: Vec<u32>,
    /// Number of occupied slots
    live: usize,
}

impl Arena {
    /// Create an empty arena whose cells are `capacity` bytes each
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            free_slots: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a zeroed cell and return its handle
    pub fn allocate(&mut self) -> Handle {
        self.live += 1;

        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.cell = Some(Cell::new(self.capacity));
            return Handle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            cell: Some(Cell::new(self.capacity)),
        });
        Handle::new(index, 0)
    }

    /// Store `bit` and the link to `next` (or the terminal marker) in `handle`'s cell
    pub fn write(&mut self, bit: Bit, handle: Handle, next: Option<Handle>) -> Result<()> {
        let link_width = self.capacity.saturating_sub(LINK_OFFSET);
        let mut link = vec![0u8; link_width];
        if let Some(next) = next {
            let encoded = next.encode();
            let n = encoded.len().min(link_width);
            link[..n].copy_from_slice(&encoded[..n]);
        }

        let cell = self.cell_mut(handle)?;
        cell.write(&[bit.as_byte()], BIT_OFFSET)?;
        cell.write(&link, LINK_OFFSET)?;
        Ok(())
    }

    /// Decode the bit and successor stored in `handle`'s cell
    pub fn read(&self, handle: Handle) -> Result<(Bit, Option<Handle>)> {
        let cell = self.cell(handle)?;

        let byte = cell.read(BIT_OFFSET, 1)?[0];
        let bit = Bit::from_byte(byte).ok_or(BitKvError::CorruptCell { handle, byte })?;

        let link = cell.read(LINK_OFFSET, self.capacity.saturating_sub(LINK_OFFSET))?;
        Ok((bit, Handle::decode_link(link)))
    }

    /// Release `handle`'s cell; returns false if it was not allocated
    pub fn free(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.live_slot_mut(handle) else {
            return false;
        };

        slot.cell = None;
        // Retired slots keep their last generation and are never handed out again
        if slot.generation < GENERATION_MASK {
            slot.generation += 1;
            self.free_slots.push(handle.slot() as u32);
        }
        self.live -= 1;
        true
    }

    /// Whether `handle` names a live cell
    pub fn contains(&self, handle: Handle) -> bool {
        self.cell(handle).is_ok()
    }

    /// Allocation statistics
    pub fn status(&self) -> ArenaStatus {
        let sample_handles = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.cell.is_some())
            .take(STATUS_SAMPLE_SIZE)
            .map(|(index, slot)| Handle::new(index as u32, slot.generation))
            .collect();

        ArenaStatus {
            allocated_blocks: self.live,
            total_bytes: self.live * self.capacity,
            sample_handles,
        }
    }

    /// Number of live cells
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Bytes per cell
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn cell(&self, handle: Handle) -> Result<&Cell> {
        self.slots
            .get(handle.slot())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.cell.as_ref())
            .ok_or(BitKvError::NotFound(handle))
    }

    fn cell_mut(&mut self, handle: Handle) -> Result<&mut Cell> {
        self.live_slot_mut(handle)
            .and_then(|slot| slot.cell.as_mut())
            .ok_or(BitKvError::NotFound(handle))
    }

    fn live_slot_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.slot())
            .filter(|slot| slot.generation == handle.generation() && slot.cell.is_some())
    }
}
