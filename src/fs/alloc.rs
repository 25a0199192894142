//! This module implements the block
//! allocator of the simulated disk.
//! It tracks which blocks are free,
//! hands them out lowest-first and
//! takes them back on release.

use super::{FSError, Geometry, Result};
use tracing::trace;

/// Index of a block on the simulated disk, starting at 0.
pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Part of the boot area, never allocatable.
    Boot,
    Free,
    Used,
}

#[derive(Debug)]
pub struct BlockAllocator {
    /// `true` means free. Reserved blocks stay `false` forever.
    free: Vec<bool>,
    reserved: usize,
    free_count: usize,
}

impl BlockAllocator {
    pub fn new(geometry: &Geometry) -> Self {
        let free = (0..geometry.block_count)
            .map(|block| block >= geometry.reserved)
            .collect();
        Self {
            free,
            reserved: geometry.reserved,
            free_count: geometry.usable(),
        }
    }

    /// Takes the lowest free block at or above the reserved threshold.
    pub fn allocate(&mut self) -> Result<BlockId> {
        let Some(block) = (self.reserved..self.free.len()).find(|&block| self.free[block]) else {
            return Err(FSError::OutOfSpace {
                needed: 1,
                free: 0,
            });
        };
        self.free[block] = false;
        self.free_count -= 1;
        trace!("Block {block} allocated");
        Ok(block)
    }

    /// Returns `block` to the pool. Out of range, reserved or
    /// already free blocks are ignored.
    pub fn release(&mut self, block: BlockId) {
        if block < self.reserved || block >= self.free.len() || self.free[block] {
            trace!("Ignoring release of block {block}");
            return;
        }
        self.free[block] = true;
        self.free_count += 1;
        trace!("Block {block} released");
    }

    pub fn free_count(&self) -> usize {
        self.free_count
    }

    pub fn is_free(&self, block: BlockId) -> bool {
        self.free.get(block).copied().unwrap_or(false)
    }

    pub fn state(&self, block: BlockId) -> BlockState {
        if block < self.reserved {
            BlockState::Boot
        } else if self.is_free(block) {
            BlockState::Free
        } else {
            BlockState::Used
        }
    }

    /// State of every block, in index order.
    pub fn states(&self) -> impl Iterator<Item = BlockState> + '_ {
        (0..self.free.len()).map(|block| self.state(block))
    }
}
