//! Fixed-Cost Cache Stand-In
//!
//! Reports every touched address as a miss at one configured cycle cost.
//! This is the default wiring for the cache seam: the session accumulates
//! the reported cycles exactly as it would for the real hierarchy, so
//! swapping in a genuine two-level model changes numbers, not plumbing.

use entities_memory_model::{CacheHierarchy, CacheLevel, CacheResponse};

/// Default miss cost when none is configured.
pub const DEFAULT_MISS_CYCLES: u64 = 100;

/// Cache stand-in with a flat per-access cost.
#[derive(Debug, Clone, Copy)]
pub struct FixedCostCache {
    miss_cycles: u64,
    probes: u64,
}

impl FixedCostCache {
    /// Create a stand-in charging `miss_cycles` per touched address.
    pub fn new(miss_cycles: u64) -> Self {
        Self {
            miss_cycles,
            probes: 0,
        }
    }

    /// Number of addresses probed so far.
    pub fn probes(&self) -> u64 {
        self.probes
    }
}

impl Default for FixedCostCache {
    fn default() -> Self {
        Self::new(DEFAULT_MISS_CYCLES)
    }
}

impl CacheHierarchy for FixedCostCache {
    fn on_address_touched(&mut self, _address: usize) -> CacheResponse {
        self.probes += 1;
        CacheResponse {
            level: CacheLevel::Miss,
            cycles: self.miss_cycles,
        }
    }
}
