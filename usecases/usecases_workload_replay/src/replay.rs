//! Trace Recording and Deterministic Replay
//!
//! `replay` is a pure function from `(backend, capacity, trace)` to
//! metrics: it constructs a fresh allocator value per call and never
//! mutates the engine. `compare` fans one trace out across all four
//! backends.

use entities_memory_model::{FitPolicy, SimResult, SimulationError, WorkloadEvent};
use usecases_buddy_allocation::BuddyAllocator;
use usecases_contiguous_allocation::AddressSpace;

/// Allocation policy a trace can be replayed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayBackend {
    /// Contiguous backend under first-fit placement.
    FirstFit,
    /// Contiguous backend under best-fit placement.
    BestFit,
    /// Contiguous backend under worst-fit placement.
    WorstFit,
    /// Binary buddy backend.
    Buddy,
}

impl ReplayBackend {
    /// All backends, in comparison-report order.
    pub const ALL: [ReplayBackend; 4] = [
        ReplayBackend::FirstFit,
        ReplayBackend::BestFit,
        ReplayBackend::WorstFit,
        ReplayBackend::Buddy,
    ];

    fn fit_policy(self) -> Option<FitPolicy> {
        match self {
            ReplayBackend::FirstFit => Some(FitPolicy::FirstFit),
            ReplayBackend::BestFit => Some(FitPolicy::BestFit),
            ReplayBackend::WorstFit => Some(FitPolicy::WorstFit),
            ReplayBackend::Buddy => None,
        }
    }
}

/// Outcome of replaying one trace against one backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayMetrics {
    /// The backend the trace ran against.
    pub backend: ReplayBackend,
    /// Allocation attempts in the trace.
    pub attempted: u64,
    /// Attempts the backend satisfied.
    pub successful: u64,
    /// `successful / attempted`, 0.0 for an all-failing run.
    pub success_rate: f64,
    /// Final external fragmentation; always 0.0 for the buddy backend.
    pub external_fragmentation: f64,
    /// Final utilization percentage.
    pub utilization: f64,
}

/// Recorded event trace and the comparison machinery over it.
#[derive(Debug, Clone, Default)]
pub struct WorkloadReplayEngine {
    trace: Vec<WorkloadEvent>,
}

impl WorkloadReplayEngine {
    /// Create an engine with an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event in issue order; never deduplicates or truncates.
    pub fn record(&mut self, event: WorkloadEvent) {
        self.trace.push(event);
    }

    /// Discard the whole trace.
    pub fn clear(&mut self) {
        self.trace.clear();
    }

    /// The recorded events in issue order.
    pub fn events(&self) -> &[WorkloadEvent] {
        &self.trace
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Replay a trace against one backend from a clean state.
    ///
    /// Allocation failures are counted by the backend's own statistics;
    /// free failures are discarded, preserving the cross-policy
    /// approximation described in the crate docs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the backend cannot be constructed
    /// for the given geometry (a buddy run over a capacity that is not
    /// `min_block_size` times a power of two).
    pub fn replay(
        backend: ReplayBackend,
        capacity: usize,
        min_block_size: usize,
        trace: &[WorkloadEvent],
    ) -> SimResult<ReplayMetrics> {
        match backend.fit_policy() {
            Some(policy) => {
                let mut space = AddressSpace::new(capacity)?;
                for event in trace {
                    match *event {
                        WorkloadEvent::Alloc(size) => {
                            let _ = space.allocate(size, policy);
                        }
                        WorkloadEvent::Free(addr) => {
                            // May legitimately no-op under this policy
                            let _ = space.free(addr);
                        }
                    }
                }
                let stats = space.stats();
                Ok(ReplayMetrics {
                    backend,
                    attempted: stats.requests,
                    successful: stats.successes,
                    success_rate: stats.success_rate(),
                    external_fragmentation: space.external_fragmentation(),
                    utilization: space.utilization(),
                })
            }
            None => {
                let mut buddy = BuddyAllocator::new(capacity, min_block_size)?;
                for event in trace {
                    match *event {
                        WorkloadEvent::Alloc(size) => {
                            let _ = buddy.allocate(size);
                        }
                        WorkloadEvent::Free(addr) => {
                            let _ = buddy.free(addr);
                        }
                    }
                }
                let stats = buddy.stats();
                Ok(ReplayMetrics {
                    backend,
                    attempted: stats.requests,
                    successful: stats.successes,
                    success_rate: stats.success_rate(),
                    external_fragmentation: 0.0,
                    utilization: buddy.utilization(),
                })
            }
        }
    }

    /// Replay the recorded trace against every backend.
    ///
    /// # Errors
    ///
    /// Returns `NoWorkloadRecorded` on an empty trace, mutating nothing,
    /// and propagates a backend construction failure.
    pub fn compare(&self, capacity: usize, min_block_size: usize) -> SimResult<Vec<ReplayMetrics>> {
        if self.trace.is_empty() {
            return Err(SimulationError::NoWorkloadRecorded);
        }
        ReplayBackend::ALL
            .iter()
            .map(|&backend| Self::replay(backend, capacity, min_block_size, &self.trace))
            .collect()
    }
}
