//! Use Cases Layer: Workload Replay
//!
//! Provides the workload-replay engine of the memory simulator: a
//! recorded trace of allocate/free attempts that can be re-executed
//! deterministically against every allocation policy to produce
//! comparable metrics.
//!
//! ## Overview
//!
//! The `usecases_workload_replay` crate treats both physical backends as
//! black boxes. Each replay builds a private allocator from a clean state
//! and applies the full trace in order; no comparison run ever shares
//! mutable state with another.
//!
//! A recorded `Free` carries the address chosen under the policy that was
//! active when the operator issued it. Replayed under a different policy
//! that address may name a block the policy never produced; the free then
//! does nothing. That is an inherent approximation of the comparison, not
//! a defect, and it is preserved as such.
//!
//! ## Examples
//!
//! ```rust
//! use entities_memory_model::WorkloadEvent;
//! use usecases_workload_replay::WorkloadReplayEngine;
//!
//! let mut engine = WorkloadReplayEngine::new();
//! engine.record(WorkloadEvent::Alloc(300));
//! engine.record(WorkloadEvent::Free(0));
//! let reports = engine.compare(1024, 128).unwrap();
//! assert_eq!(reports.len(), 4);
//! ```

pub mod replay;

pub use replay::{ReplayBackend, ReplayMetrics, WorkloadReplayEngine};
