//! Binary Buddy Allocator
//!
//! State is a fixed array of address-ordered free sets indexed by order
//! plus an allocation table keyed by address. Two addresses merge only
//! when they are true siblings split from the same parent, which is
//! exactly when they coincide under `addr XOR block_size`.

use std::collections::{BTreeMap, BTreeSet};

use entities_memory_model::{AllocationStats, SimResult, SimulationError};

/// Live allocation record: the order the grant was made at and the size
/// the caller actually asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyAllocation {
    /// Order of the granted block; granted size is
    /// `min_block_size * 2^order`.
    pub order: usize,
    /// Requested size in bytes, kept for internal-fragmentation
    /// accounting.
    pub requested: usize,
}

/// Binary buddy allocator over `[0, total)`.
#[derive(Debug, Clone)]
pub struct BuddyAllocator {
    total: usize,
    min_block_size: usize,
    max_order: usize,
    /// Free addresses per order; index is the order.
    free_lists: Vec<BTreeSet<usize>>,
    /// Allocated address -> grant record.
    allocations: BTreeMap<usize, BuddyAllocation>,
    stats: AllocationStats,
}

impl BuddyAllocator {
    /// Create an allocator whose range is exactly
    /// `min_block_size * 2^max_order` bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `min_block_size` is zero or not a
    /// power of two, or when `total` is not `min_block_size` times a
    /// power of two. Configurations that would need truncation are
    /// rejected, never rounded.
    pub fn new(total: usize, min_block_size: usize) -> SimResult<Self> {
        if min_block_size == 0 || !min_block_size.is_power_of_two() {
            return Err(SimulationError::InvalidArgument(format!(
                "minimum block size {} is not a power of two",
                min_block_size
            )));
        }
        if total < min_block_size
            || total % min_block_size != 0
            || !(total / min_block_size).is_power_of_two()
        {
            return Err(SimulationError::InvalidArgument(format!(
                "total size {} is not {} times a power of two",
                total, min_block_size
            )));
        }

        let max_order = (total / min_block_size).trailing_zeros() as usize;
        let mut free_lists = vec![BTreeSet::new(); max_order + 1];
        free_lists[max_order].insert(0);

        Ok(Self {
            total,
            min_block_size,
            max_order,
            free_lists,
            allocations: BTreeMap::new(),
            stats: AllocationStats::default(),
        })
    }

    /// Allocate at least `size` bytes, rounded up to the nearest order.
    ///
    /// If no block is free at the target order, the smallest free block
    /// of a higher order is split repeatedly: each step keeps the lower
    /// half and pushes the upper half onto the next-lower free list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero size and `ResourceExhausted`
    /// when `size` exceeds the range or no block is free at or above the
    /// target order.
    pub fn allocate(&mut self, size: usize) -> SimResult<usize> {
        if size == 0 {
            self.stats.record_failure();
            return Err(SimulationError::InvalidArgument(
                "allocation size must be positive".to_string(),
            ));
        }
        if size > self.total {
            self.stats.record_failure();
            return Err(SimulationError::ResourceExhausted(format!(
                "request of {} bytes exceeds total size {}",
                size, self.total
            )));
        }

        // Smallest order at or above the target with a free block; take
        // its lowest address
        let target_order = self.size_to_order(size);
        let found = (target_order..=self.max_order).find_map(|order| {
            self.free_lists[order]
                .iter()
                .next()
                .copied()
                .map(|address| (order, address))
        });
        let (source_order, address) = match found {
            Some(found) => found,
            None => {
                self.stats.record_failure();
                return Err(SimulationError::ResourceExhausted(format!(
                    "no free block at or above order {}",
                    target_order
                )));
            }
        };
        self.free_lists[source_order].remove(&address);

        // Halve down toward the target order, keeping the lower half
        let mut order = source_order;
        while order > target_order {
            order -= 1;
            let upper_half = address + self.block_size(order);
            self.free_lists[order].insert(upper_half);
        }

        self.allocations.insert(
            address,
            BuddyAllocation {
                order: target_order,
                requested: size,
            },
        );
        self.stats.record_success();
        Ok(address)
    }

    /// Free the allocation starting at `address`, merging with its buddy
    /// as many times as both halves are free.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `address` is not in the allocation
    /// table; nothing is mutated in that case.
    pub fn free(&mut self, address: usize) -> SimResult<()> {
        let allocation = self.allocations.remove(&address).ok_or_else(|| {
            SimulationError::InvalidArgument(format!(
                "address {} is not an allocated block",
                address
            ))
        })?;

        let mut address = address;
        let mut order = allocation.order;
        while order < self.max_order {
            let buddy = address ^ self.block_size(order);
            if !self.free_lists[order].remove(&buddy) {
                break;
            }
            // Both siblings free: the merged block starts at the lower one
            address = address.min(buddy);
            order += 1;
        }
        self.free_lists[order].insert(address);

        Ok(())
    }

    /// Bytes currently granted: total minus the free-list remainder.
    pub fn used_memory(&self) -> usize {
        let free: usize = self
            .free_lists
            .iter()
            .enumerate()
            .map(|(order, list)| list.len() * self.block_size(order))
            .sum();
        self.total - free
    }

    /// Sum of granted-minus-requested over live allocations; the only
    /// fragmentation this allocator exhibits.
    pub fn internal_fragmentation(&self) -> f64 {
        self.allocations
            .values()
            .map(|a| (self.block_size(a.order) - a.requested) as f64)
            .sum()
    }

    /// Granted share of the range, as a percentage.
    pub fn utilization(&self) -> f64 {
        100.0 * self.used_memory() as f64 / self.total as f64
    }

    /// Block size of the given order.
    pub fn block_size(&self, order: usize) -> usize {
        self.min_block_size << order
    }

    /// Size of the managed range.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Smallest grantable block size.
    pub fn min_block_size(&self) -> usize {
        self.min_block_size
    }

    /// Highest order; the whole range is one block of this order.
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Free addresses per order, for dumps and diagnostics.
    pub fn free_lists(&self) -> &[BTreeSet<usize>] {
        &self.free_lists
    }

    /// The allocation table with requested sizes, for dumps and
    /// diagnostics; granted size is [`block_size`](Self::block_size) of
    /// the recorded order.
    pub fn allocations(&self) -> &BTreeMap<usize, BuddyAllocation> {
        &self.allocations
    }

    /// Allocation counters for this instance.
    pub fn stats(&self) -> AllocationStats {
        self.stats
    }

    fn size_to_order(&self, size: usize) -> usize {
        let mut order = 0;
        while self.block_size(order) < size {
            order += 1;
        }
        order
    }
}
