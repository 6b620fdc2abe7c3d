//! Cache Hierarchy Boundary
//!
//! The simulator consults an external two-level cache hierarchy after
//! every successful allocate, free or translated access. The hierarchy is
//! a separate subsystem: the core hands it an address and receives back
//! which level served it and what the access cost, never inspecting its
//! internals.

/// Which level of the hierarchy served an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLevel {
    /// Served by the first-level cache.
    L1,
    /// Served by the second-level cache.
    L2,
    /// Served by neither level.
    Miss,
}

/// Outcome of one address probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheResponse {
    /// The level that served the access.
    pub level: CacheLevel,
    /// Cycle cost of the access, accumulated by the session.
    pub cycles: u64,
}

/// Boundary to the cache hierarchy.
///
/// Implementations decide hit/miss placement and cycle costs however they
/// like; the core only accumulates the reported cycles.
pub trait CacheHierarchy {
    /// Report the cache outcome for one touched address.
    fn on_address_touched(&mut self, address: usize) -> CacheResponse;
}
