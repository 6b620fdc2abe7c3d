//! Ordered Partition of the Simulated Address Range
//!
//! An [`AddressSpace`] keeps every byte of `[0, total)` in exactly one
//! block. Two invariants hold after every operation:
//!
//! - the block sequence is address-contiguous with no gaps or overlaps
//! - no two adjacent blocks are free at the same time (coalescing is
//!   immediate, never deferred)
//!
//! Failed operations never touch the block list.

use entities_memory_model::{AllocationStats, FitPolicy, SimResult, SimulationError};

use crate::placement;

/// One region of the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// First address of the region.
    pub start: usize,
    /// Region length in bytes; never zero.
    pub size: usize,
    /// Whether the region is available for allocation.
    pub free: bool,
    /// Allocation id, present exactly while the block is allocated.
    /// Ids are handed out monotonically and retired on free, never reused.
    pub id: Option<u64>,
}

/// Contiguous allocator over a simulated physical range.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    total: usize,
    blocks: Vec<Block>,
    next_id: u64,
    stats: AllocationStats,
}

impl AddressSpace {
    /// Create an address space covering `[0, total)` as one free block.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `total` is zero.
    pub fn new(total: usize) -> SimResult<Self> {
        if total == 0 {
            return Err(SimulationError::InvalidArgument(
                "total size must be positive".to_string(),
            ));
        }
        Ok(Self {
            total,
            blocks: vec![Block {
                start: 0,
                size: total,
                free: true,
                id: None,
            }],
            next_id: 1,
            stats: AllocationStats::default(),
        })
    }

    /// Allocate `size` bytes under the given placement policy.
    ///
    /// The chosen free block is either marked allocated in place (exact
    /// fit) or split into an allocated prefix of exactly `size` bytes
    /// followed by a free remainder. Every call counts as a request;
    /// failures are counted and leave the partition untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero size and `ResourceExhausted`
    /// when no free block is large enough.
    pub fn allocate(&mut self, size: usize, policy: FitPolicy) -> SimResult<usize> {
        if size == 0 {
            self.stats.record_failure();
            return Err(SimulationError::InvalidArgument(
                "allocation size must be positive".to_string(),
            ));
        }

        let index = match self.select_block(size, policy) {
            Some(index) => index,
            None => {
                self.stats.record_failure();
                return Err(SimulationError::ResourceExhausted(format!(
                    "no free block of {} bytes",
                    size
                )));
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let block = &mut self.blocks[index];
        let remainder = block.size - size;
        block.free = false;
        block.id = Some(id);

        if remainder > 0 {
            // Split: allocated prefix keeps the start, the tail stays free
            block.size = size;
            let tail_start = block.start + size;
            self.blocks.insert(
                index + 1,
                Block {
                    start: tail_start,
                    size: remainder,
                    free: true,
                    id: None,
                },
            );
        }

        self.stats.record_success();
        Ok(self.blocks[index].start)
    }

    /// Free the allocated block starting at `address`.
    ///
    /// The block is marked free, its id is retired, and it is merged with
    /// a free predecessor and/or successor so no two adjacent free blocks
    /// remain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if no allocated block starts at
    /// `address`; freeing an already-free address is the same error and
    /// never double-coalesces.
    pub fn free(&mut self, address: usize) -> SimResult<()> {
        let index = self
            .blocks
            .iter()
            .position(|b| b.start == address && !b.free)
            .ok_or_else(|| {
                SimulationError::InvalidArgument(format!(
                    "no allocated block starts at address {}",
                    address
                ))
            })?;

        self.blocks[index].free = true;
        self.blocks[index].id = None;

        // Merge with a free successor
        if index + 1 < self.blocks.len() && self.blocks[index + 1].free {
            self.blocks[index].size += self.blocks[index + 1].size;
            self.blocks.remove(index + 1);
        }

        // Merge with a free predecessor
        if index > 0 && self.blocks[index - 1].free {
            self.blocks[index - 1].size += self.blocks[index].size;
            self.blocks.remove(index);
        }

        Ok(())
    }

    /// Free capacity wasted by splitting: total free bytes minus the
    /// single largest free block.
    pub fn external_fragmentation(&self) -> f64 {
        let mut free_total = 0usize;
        let mut largest = 0usize;
        for block in self.blocks.iter().filter(|b| b.free) {
            free_total += block.size;
            largest = largest.max(block.size);
        }
        (free_total - largest) as f64
    }

    /// Always zero: splits are exact-sized, so no granted byte goes
    /// unused. Kept for reporting symmetry with the buddy backend.
    pub fn internal_fragmentation(&self) -> f64 {
        0.0
    }

    /// Allocated share of the range, as a percentage.
    pub fn utilization(&self) -> f64 {
        100.0 * self.allocated_bytes() as f64 / self.total as f64
    }

    /// Size of the managed range.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The address-ordered partition, for dumps and diagnostics.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Allocation counters for this instance.
    pub fn stats(&self) -> AllocationStats {
        self.stats
    }

    fn allocated_bytes(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !b.free)
            .map(|b| b.size)
            .sum()
    }

    fn select_block(&self, size: usize, policy: FitPolicy) -> Option<usize> {
        match policy {
            FitPolicy::FirstFit => placement::first_fit(&self.blocks, size),
            FitPolicy::BestFit => placement::best_fit(&self.blocks, size),
            FitPolicy::WorstFit => placement::worst_fit(&self.blocks, size),
        }
    }
}
