use eyre::{ensure, Result};

/// Shape of the simulated disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Total blocks on the disk, reserved ones included.
    pub block_count: usize,
    /// Blocks `0..reserved` belong to the boot area and are never handed out.
    pub reserved: usize,
    /// Size of a single block in bytes.
    pub block_size: u64,
}

impl Geometry {
    pub const DEFAULT_BLOCK_COUNT: usize = 256;
    pub const DEFAULT_RESERVED: usize = 10;
    pub const DEFAULT_BLOCK_SIZE: u64 = 512;

    pub fn new(block_count: usize, reserved: usize, block_size: u64) -> Result<Self> {
        ensure!(block_size > 0, "Invalid block size {block_size}: must be positive");
        ensure!(
            reserved < block_count,
            "Invalid geometry: {reserved} reserved blocks leave nothing allocatable out of {block_count}",
        );
        ensure!(
            u64::try_from(block_count)
                .ok()
                .and_then(|count| count.checked_mul(block_size))
                .is_some(),
            "Invalid geometry: {block_count} blocks of {block_size} bytes overflow the disk size",
        );
        Ok(Self {
            block_count,
            reserved,
            block_size,
        })
    }

    /// Blocks that can ever be allocated.
    pub fn usable(&self) -> usize {
        self.block_count - self.reserved
    }

    /// Number of blocks needed to hold `size` bytes.
    pub fn blocks_for(&self, size: u64) -> u64 {
        size.div_ceil(self.block_size)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            block_count: Self::DEFAULT_BLOCK_COUNT,
            reserved: Self::DEFAULT_RESERVED,
            block_size: Self::DEFAULT_BLOCK_SIZE,
        }
    }
}
