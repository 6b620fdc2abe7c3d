//! Simulator Session Facade
//!
//! A session runs exactly one physical backend at a time; switching
//! means re-initialization, which replaces the backend instance rather
//! than mutating it in place. The paging manager is orthogonal and keeps
//! its state across backend re-initialization.
//!
//! Every allocate/free attempt is recorded into the workload trace,
//! successful or not, so a later replay sees the same attempt stream the
//! operator issued. After every successful operation that yields an
//! address the session probes the cache boundary and accumulates the
//! reported cycle cost.

use adapters_cache_hierarchy::FixedCostCache;
use entities_memory_model::{
    AllocationStats, CacheHierarchy, FitPolicy, SimResult, WorkloadEvent,
};
use usecases_buddy_allocation::BuddyAllocator;
use usecases_contiguous_allocation::AddressSpace;
use usecases_virtual_memory::{PagingManager, ProcessId};
use usecases_workload_replay::{ReplayMetrics, WorkloadReplayEngine};

/// Startup geometry and costs for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Size of the simulated physical range the backends manage.
    pub total_size: usize,
    /// Smallest buddy grant; also used when a trace replays against the
    /// buddy backend.
    pub min_block_size: usize,
    /// Physical memory available to the paging manager.
    pub physical_size: usize,
    /// Page and frame size.
    pub page_size: usize,
    /// Cycles charged per page fault.
    pub fault_penalty: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_size: 1024,
            min_block_size: 128,
            physical_size: 512,
            page_size: 256,
            fault_penalty: 100,
        }
    }
}

/// The active physical backend; exactly one per session.
#[derive(Debug)]
pub enum PhysicalBackend {
    /// Contiguous allocator with fit policies.
    Contiguous(AddressSpace),
    /// Binary buddy allocator.
    Buddy(BuddyAllocator),
}

/// Aggregate statistics over every subsystem a session owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// External fragmentation of the active backend (0.0 for buddy).
    pub external_fragmentation: f64,
    /// Internal fragmentation of the active backend (0.0 for contiguous).
    pub internal_fragmentation: f64,
    /// Utilization percentage of the active backend.
    pub utilization: f64,
    /// Allocation counters of the active backend.
    pub allocation: AllocationStats,
    /// Cumulative page hits.
    pub page_hits: u64,
    /// Cumulative page faults.
    pub page_faults: u64,
    /// Cycles charged for page faults.
    pub penalty_cycles: u64,
    /// Cycles reported by the cache hierarchy.
    pub cache_cycles: u64,
    /// Frames in the shared pool.
    pub total_frames: usize,
    /// Events currently recorded in the workload trace.
    pub recorded_events: usize,
}

/// One simulator session: backend, paging, workload trace and cache seam.
pub struct SimulatorSession {
    config: SessionConfig,
    backend: PhysicalBackend,
    paging: PagingManager,
    workload: WorkloadReplayEngine,
    cache: Box<dyn CacheHierarchy>,
    cache_cycles: u64,
}

impl SimulatorSession {
    /// Create a session on the contiguous backend with the given cache
    /// implementation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the allocator or paging geometry
    /// is rejected.
    pub fn new(config: SessionConfig, cache: Box<dyn CacheHierarchy>) -> SimResult<Self> {
        Ok(Self {
            backend: PhysicalBackend::Contiguous(AddressSpace::new(config.total_size)?),
            paging: PagingManager::new(
                config.physical_size,
                config.page_size,
                config.fault_penalty,
            )?,
            workload: WorkloadReplayEngine::new(),
            cache,
            cache_cycles: 0,
            config,
        })
    }

    /// Create a session with the default geometry and the fixed-cost
    /// cache stand-in.
    pub fn with_defaults() -> SimResult<Self> {
        Self::new(
            SessionConfig::default(),
            Box::new(FixedCostCache::default()),
        )
    }

    /// Re-initialize onto a fresh contiguous backend of `total` bytes.
    ///
    /// The old backend is discarded entirely; paging state and the
    /// workload trace survive.
    pub fn init_contiguous(&mut self, total: usize) -> SimResult<()> {
        self.backend = PhysicalBackend::Contiguous(AddressSpace::new(total)?);
        self.config.total_size = total;
        Ok(())
    }

    /// Re-initialize onto a fresh buddy backend.
    pub fn init_buddy(&mut self, total: usize, min_block_size: usize) -> SimResult<()> {
        self.backend = PhysicalBackend::Buddy(BuddyAllocator::new(total, min_block_size)?);
        self.config.total_size = total;
        self.config.min_block_size = min_block_size;
        Ok(())
    }

    /// Allocate through the active backend and record the attempt.
    ///
    /// `policy` selects placement on the contiguous backend; the buddy
    /// backend has a single placement rule and ignores it.
    pub fn allocate(&mut self, size: usize, policy: FitPolicy) -> SimResult<usize> {
        let result = match &mut self.backend {
            PhysicalBackend::Contiguous(space) => space.allocate(size, policy),
            PhysicalBackend::Buddy(buddy) => buddy.allocate(size),
        };
        self.workload.record(WorkloadEvent::Alloc(size));
        if let Ok(address) = result {
            self.touch(address);
        }
        result
    }

    /// Free through the active backend and record the attempt.
    pub fn free(&mut self, address: usize) -> SimResult<()> {
        let result = match &mut self.backend {
            PhysicalBackend::Contiguous(space) => space.free(address),
            PhysicalBackend::Buddy(buddy) => buddy.free(address),
        };
        self.workload.record(WorkloadEvent::Free(address));
        if result.is_ok() {
            self.touch(address);
        }
        result
    }

    /// Install a fresh page table for `pid`.
    pub fn vm_init_process(&mut self, pid: ProcessId, virtual_size: usize) -> SimResult<()> {
        self.paging.init_process(pid, virtual_size)
    }

    /// Translate a virtual address and probe the cache with the result.
    pub fn vm_access(&mut self, pid: ProcessId, vaddr: usize) -> SimResult<usize> {
        let paddr = self.paging.access(pid, vaddr)?;
        self.touch(paddr);
        Ok(paddr)
    }

    /// Replay the recorded trace against all four backends at the
    /// session's current total size.
    ///
    /// # Errors
    ///
    /// Returns `NoWorkloadRecorded` on an empty trace, mutating nothing.
    pub fn compare(&self) -> SimResult<Vec<ReplayMetrics>> {
        self.workload
            .compare(self.config.total_size, self.config.min_block_size)
    }

    /// Discard the recorded trace.
    pub fn clear_workload(&mut self) {
        self.workload.clear();
    }

    /// Aggregate statistics across backend, paging, cache and trace.
    pub fn stats(&self) -> StatsSnapshot {
        let (external, internal, utilization, allocation) = match &self.backend {
            PhysicalBackend::Contiguous(space) => (
                space.external_fragmentation(),
                space.internal_fragmentation(),
                space.utilization(),
                space.stats(),
            ),
            PhysicalBackend::Buddy(buddy) => (
                0.0,
                buddy.internal_fragmentation(),
                buddy.utilization(),
                buddy.stats(),
            ),
        };
        StatsSnapshot {
            external_fragmentation: external,
            internal_fragmentation: internal,
            utilization,
            allocation,
            page_hits: self.paging.hits(),
            page_faults: self.paging.faults(),
            penalty_cycles: self.paging.penalty_cycles(),
            cache_cycles: self.cache_cycles,
            total_frames: self.paging.total_frames(),
            recorded_events: self.workload.len(),
        }
    }

    /// The active backend, for dumps and diagnostics.
    pub fn backend(&self) -> &PhysicalBackend {
        &self.backend
    }

    /// The paging manager, for dumps and diagnostics.
    pub fn paging(&self) -> &PagingManager {
        &self.paging
    }

    /// The recorded workload.
    pub fn workload(&self) -> &WorkloadReplayEngine {
        &self.workload
    }

    /// Session geometry as currently configured.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Cycles accumulated from the cache hierarchy so far.
    pub fn cache_cycles(&self) -> u64 {
        self.cache_cycles
    }

    fn touch(&mut self, address: usize) {
        let response = self.cache.on_address_touched(address);
        self.cache_cycles += response.cycles;
    }
}
