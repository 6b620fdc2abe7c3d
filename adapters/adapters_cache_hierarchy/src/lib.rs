//! Adapters Layer: Cache Hierarchy
//!
//! Adapts the external two-level cache hierarchy behind the
//! [`CacheHierarchy`] boundary. The hierarchy itself is a separate
//! subsystem; this crate ships the stand-in implementation the simulator
//! wires in by default.

pub mod fixed_cost;

pub use fixed_cost::FixedCostCache;

#[doc(inline)]
pub use entities_memory_model::{CacheHierarchy, CacheLevel, CacheResponse};
