//! Infrastructure Layer: Debugging
//!
//! Provides the switchable debug-output facility used for simulator
//! narration (page faults and evictions).

pub mod debug_utils;

pub use debug_utils::DebugUtils;
