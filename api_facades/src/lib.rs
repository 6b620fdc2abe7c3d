//! API Facades Layer
//!
//! Provides the simulator session facade: the one surface outer callers
//! (the command loop, tests, embedding code) interact with. The facade
//! owns the active physical backend, the paging manager, the workload
//! trace and the cache boundary, and keeps their interactions in one
//! place so the inner crates stay independent of each other.

pub mod session;

pub use session::{PhysicalBackend, SessionConfig, SimulatorSession, StatsSnapshot};
