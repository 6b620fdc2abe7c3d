//! Simulation Error Types
//!
//! Every fallible operation in the simulator reports one of the error
//! categories below. Nothing in the core is fatal: a failed operation
//! leaves all allocator and paging state exactly as it was.

use std::fmt;

/// Errors reported by allocator, paging and replay operations.
///
/// Freeing an address that is already free or was never allocated is an
/// inconsistency recovered locally; it is reported as `InvalidArgument`
/// rather than given its own category.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The caller passed an argument the operation cannot act on:
    /// a zero size, an unknown or already-free address, a virtual
    /// address outside the process's address space, or a rejected
    /// configuration.
    InvalidArgument(String),
    /// The request was well formed but no free region can satisfy it.
    ResourceExhausted(String),
    /// A comparison was requested before any workload was recorded.
    NoWorkloadRecorded,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {}", msg)
            }
            SimulationError::ResourceExhausted(msg) => {
                write!(f, "Resource exhausted: {}", msg)
            }
            SimulationError::NoWorkloadRecorded => {
                write!(f, "no workload recorded")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result alias used across the simulator core.
pub type SimResult<T> = Result<T, SimulationError>;
