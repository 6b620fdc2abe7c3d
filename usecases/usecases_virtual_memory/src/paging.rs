//! Demand Paging over a Shared Frame Pool
//!
//! Frame ownership is global: `frame_owner[f]` names the (process, page)
//! pair holding frame `f`, or nothing. A page table entry is valid
//! exactly when the owning frame's reverse mapping points back at it.

use std::collections::BTreeMap;

use entities_memory_model::{SimResult, SimulationError};
use infrastructure_debugging::DebugUtils;

/// Identifier of a simulated process.
pub type ProcessId = u32;

/// One virtual page's mapping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    /// Whether the page currently holds a frame.
    pub valid: bool,
    /// Owned frame index; meaningful only while `valid`.
    pub frame: usize,
    /// Logical time of the last access; drives global LRU eviction.
    pub last_used: u64,
}

impl PageTableEntry {
    fn invalid() -> Self {
        Self {
            valid: false,
            frame: 0,
            last_used: 0,
        }
    }
}

/// Per-process page tables plus the shared physical frame pool.
#[derive(Debug)]
pub struct PagingManager {
    page_size: usize,
    /// Reverse mapping: frame index -> owning (process, page).
    frame_owner: Vec<Option<(ProcessId, usize)>>,
    tables: BTreeMap<ProcessId, Vec<PageTableEntry>>,
    clock: u64,
    hits: u64,
    faults: u64,
    fault_penalty: u64,
    penalty_cycles: u64,
}

impl PagingManager {
    /// Create a manager with `physical_size / page_size` frames and the
    /// given per-fault penalty in cycles.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `page_size` is zero or
    /// `physical_size` is zero or not a multiple of `page_size`;
    /// geometries that would need truncation are rejected.
    pub fn new(physical_size: usize, page_size: usize, fault_penalty: u64) -> SimResult<Self> {
        if page_size == 0 {
            return Err(SimulationError::InvalidArgument(
                "page size must be positive".to_string(),
            ));
        }
        if physical_size == 0 || physical_size % page_size != 0 {
            return Err(SimulationError::InvalidArgument(format!(
                "physical size {} is not a positive multiple of page size {}",
                physical_size, page_size
            )));
        }
        Ok(Self {
            page_size,
            frame_owner: vec![None; physical_size / page_size],
            tables: BTreeMap::new(),
            clock: 0,
            hits: 0,
            faults: 0,
            fault_penalty,
            penalty_cycles: 0,
        })
    }

    /// Install a fresh all-invalid page table for `pid`, sized
    /// `virtual_size / page_size`.
    ///
    /// Re-initializing an existing process first releases every frame it
    /// owns back to the shared pool; dropping the old table alone would
    /// leave its frames owned forever.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `virtual_size` is zero or not a
    /// multiple of the page size.
    pub fn init_process(&mut self, pid: ProcessId, virtual_size: usize) -> SimResult<()> {
        if virtual_size == 0 || virtual_size % self.page_size != 0 {
            return Err(SimulationError::InvalidArgument(format!(
                "virtual size {} is not a positive multiple of page size {}",
                virtual_size, self.page_size
            )));
        }

        if self.tables.contains_key(&pid) {
            self.release_frames_of(pid);
        }

        let page_count = virtual_size / self.page_size;
        self.tables
            .insert(pid, vec![PageTableEntry::invalid(); page_count]);
        Ok(())
    }

    /// Translate a virtual address for `pid`, faulting the page in if
    /// needed.
    ///
    /// A valid entry counts a hit and refreshes its access time. An
    /// invalid entry counts a fault, charges the fault penalty, claims
    /// the lowest-index unowned frame if one exists, and otherwise evicts
    /// the globally least recently used frame (ties broken by lowest
    /// frame index) across all processes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown `pid` or a virtual
    /// address outside the process's address space; neither advances the
    /// clock nor touches any counter.
    pub fn access(&mut self, pid: ProcessId, vaddr: usize) -> SimResult<usize> {
        let page = vaddr / self.page_size;
        let offset = vaddr % self.page_size;

        let table = self.tables.get(&pid).ok_or_else(|| {
            SimulationError::InvalidArgument(format!("unknown process {}", pid))
        })?;
        if page >= table.len() {
            return Err(SimulationError::InvalidArgument(format!(
                "virtual address {} is outside process {}'s address space",
                vaddr, pid
            )));
        }

        let entry = table[page];
        self.clock += 1;

        if entry.valid {
            self.hits += 1;
            self.set_entry(
                pid,
                page,
                PageTableEntry {
                    last_used: self.clock,
                    ..entry
                },
            );
            return Ok(entry.frame * self.page_size + offset);
        }

        // Pick the frame before touching any counter so a selection
        // failure mutates nothing
        let (frame, evicted) = match self.frame_owner.iter().position(Option::is_none) {
            Some(frame) => (frame, None),
            None => {
                let (frame, victim_pid, victim_page) =
                    self.choose_victim().ok_or_else(|| {
                        SimulationError::ResourceExhausted("frame pool is empty".to_string())
                    })?;
                (frame, Some((victim_pid, victim_page)))
            }
        };

        self.faults += 1;
        self.penalty_cycles += self.fault_penalty;
        DebugUtils::debug_output(&format!("PAGE FAULT on page {} (process {})", page, pid));

        if let Some((victim_pid, victim_page)) = evicted {
            DebugUtils::debug_output(&format!(
                "Evicting page {} (process {}) from frame {}",
                victim_page, victim_pid, frame
            ));
            if let Some(victim_entry) = self.entry(victim_pid, victim_page) {
                self.set_entry(
                    victim_pid,
                    victim_page,
                    PageTableEntry {
                        valid: false,
                        ..victim_entry
                    },
                );
            }
        }

        self.frame_owner[frame] = Some((pid, page));
        self.set_entry(
            pid,
            page,
            PageTableEntry {
                valid: true,
                frame,
                last_used: self.clock,
            },
        );

        Ok(frame * self.page_size + offset)
    }

    /// Cumulative page hits.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Cumulative page faults.
    pub fn faults(&self) -> u64 {
        self.faults
    }

    /// Cycles charged for faults so far.
    pub fn penalty_cycles(&self) -> u64 {
        self.penalty_cycles
    }

    /// Number of frames in the shared pool.
    pub fn total_frames(&self) -> usize {
        self.frame_owner.len()
    }

    /// Configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Count of currently valid entries in `pid`'s table.
    pub fn resident_pages(&self, pid: ProcessId) -> SimResult<usize> {
        Ok(self
            .table(pid)?
            .iter()
            .filter(|entry| entry.valid)
            .count())
    }

    /// The process's page table, for dumps and diagnostics.
    pub fn page_table(&self, pid: ProcessId) -> SimResult<&[PageTableEntry]> {
        self.table(pid).map(Vec::as_slice)
    }

    /// Known process ids, in ascending order.
    pub fn processes(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.tables.keys().copied()
    }

    fn table(&self, pid: ProcessId) -> SimResult<&Vec<PageTableEntry>> {
        self.tables.get(&pid).ok_or_else(|| {
            SimulationError::InvalidArgument(format!("unknown process {}", pid))
        })
    }

    fn entry(&self, pid: ProcessId, page: usize) -> Option<PageTableEntry> {
        self.tables
            .get(&pid)
            .and_then(|table| table.get(page))
            .copied()
    }

    fn set_entry(&mut self, pid: ProcessId, page: usize, entry: PageTableEntry) {
        if let Some(slot) = self
            .tables
            .get_mut(&pid)
            .and_then(|table| table.get_mut(page))
        {
            *slot = entry;
        }
    }

    /// Globally least recently used frame; ties go to the lowest index.
    fn choose_victim(&self) -> Option<(usize, ProcessId, usize)> {
        let mut victim: Option<(usize, ProcessId, usize, u64)> = None;
        for (frame, owner) in self.frame_owner.iter().enumerate() {
            if let Some((pid, page)) = *owner {
                let last_used = self
                    .entry(pid, page)
                    .map(|entry| entry.last_used)
                    .unwrap_or(0);
                match victim {
                    Some((_, _, _, oldest)) if oldest <= last_used => {}
                    _ => victim = Some((frame, pid, page, last_used)),
                }
            }
        }
        victim.map(|(frame, pid, page, _)| (frame, pid, page))
    }

    fn release_frames_of(&mut self, pid: ProcessId) {
        for owner in self.frame_owner.iter_mut() {
            if matches!(owner, Some((owning_pid, _)) if *owning_pid == pid) {
                *owner = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A frame is owned by at most one (process, page) pair, and an entry
    /// is valid exactly when its frame points back at it.
    fn assert_ownership(paging: &PagingManager) {
        let mut owned_pairs = Vec::new();
        for (frame, owner) in paging.frame_owner.iter().enumerate() {
            if let Some((pid, page)) = owner {
                assert!(!owned_pairs.contains(&(*pid, *page)));
                owned_pairs.push((*pid, *page));
                let entry = paging.tables[pid][*page];
                assert!(entry.valid);
                assert_eq!(entry.frame, frame);
            }
        }
        for (pid, table) in &paging.tables {
            for (page, entry) in table.iter().enumerate() {
                if entry.valid {
                    assert_eq!(paging.frame_owner[entry.frame], Some((*pid, page)));
                }
            }
        }
    }

    #[test]
    fn test_geometry_is_validated() {
        assert!(PagingManager::new(512, 0, 0).is_err());
        assert!(PagingManager::new(0, 256, 0).is_err());
        assert!(PagingManager::new(500, 256, 0).is_err());

        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        assert_eq!(paging.total_frames(), 2);
        assert!(paging.init_process(1, 0).is_err());
        assert!(paging.init_process(1, 1000).is_err());
    }

    #[test]
    fn test_hit_returns_same_frame() {
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 1024).unwrap();

        let first = paging.access(1, 100).unwrap();
        let second = paging.access(1, 130).unwrap();
        assert_eq!(first, 100);
        assert_eq!(second, 130);
        assert_eq!(paging.faults(), 1);
        assert_eq!(paging.hits(), 1);
        assert_ownership(&paging);
    }

    #[test]
    fn test_offset_is_preserved_through_translation() {
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 1024).unwrap();

        // Page 2 lands in frame 0, so 2*256+5 translates to offset 5
        let paddr = paging.access(1, 2 * 256 + 5).unwrap();
        assert_eq!(paddr, 5);
        assert_ownership(&paging);
    }

    #[test]
    fn test_lru_eviction_across_pages() {
        // 4 virtual pages over 2 frames
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 1024).unwrap();

        paging.access(1, 0).unwrap();
        paging.access(1, 256).unwrap();

        // Third page evicts page 0, the least recently used
        paging.access(1, 512).unwrap();
        assert_eq!(paging.faults(), 3);
        let table = paging.page_table(1).unwrap();
        assert!(!table[0].valid);
        assert!(table[1].valid);
        assert!(table[2].valid);
        assert_ownership(&paging);

        // Coming back to page 0 faults again and evicts page 1
        paging.access(1, 0).unwrap();
        assert_eq!(paging.faults(), 4);
        let table = paging.page_table(1).unwrap();
        assert!(table[0].valid);
        assert!(!table[1].valid);
        assert_ownership(&paging);
    }

    #[test]
    fn test_eviction_is_global_across_processes() {
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 512).unwrap();
        paging.init_process(2, 512).unwrap();

        paging.access(1, 0).unwrap();
        paging.access(2, 0).unwrap();

        // Process 2's second page steals process 1's frame, the global LRU
        paging.access(2, 256).unwrap();
        assert_eq!(paging.resident_pages(1).unwrap(), 0);
        assert_eq!(paging.resident_pages(2).unwrap(), 2);
        assert_ownership(&paging);
    }

    #[test]
    fn test_refresh_protects_recently_used_page() {
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 1024).unwrap();

        paging.access(1, 0).unwrap();
        paging.access(1, 256).unwrap();

        // Refresh page 0 so page 1 in frame 1 is the unique LRU
        paging.access(1, 0).unwrap();
        paging.access(1, 512).unwrap();
        let table = paging.page_table(1).unwrap();
        assert!(table[0].valid);
        assert!(!table[1].valid);
        assert_eq!(table[2].frame, 1);
        assert_ownership(&paging);
    }

    #[test]
    fn test_out_of_range_access_mutates_nothing() {
        let mut paging = PagingManager::new(512, 256, 50).unwrap();
        paging.init_process(1, 512).unwrap();
        paging.access(1, 0).unwrap();

        assert!(matches!(
            paging.access(1, 512),
            Err(SimulationError::InvalidArgument(_))
        ));
        assert!(matches!(
            paging.access(7, 0),
            Err(SimulationError::InvalidArgument(_))
        ));

        assert_eq!(paging.hits(), 0);
        assert_eq!(paging.faults(), 1);
        assert_eq!(paging.penalty_cycles(), 50);
        assert_ownership(&paging);
    }

    #[test]
    fn test_fault_penalty_accumulates() {
        let mut paging = PagingManager::new(512, 256, 100).unwrap();
        paging.init_process(1, 1024).unwrap();

        paging.access(1, 0).unwrap();
        paging.access(1, 10).unwrap();
        paging.access(1, 256).unwrap();
        assert_eq!(paging.penalty_cycles(), 200);
    }

    #[test]
    fn test_reinit_releases_frames() {
        let mut paging = PagingManager::new(512, 256, 0).unwrap();
        paging.init_process(1, 512).unwrap();
        paging.access(1, 0).unwrap();
        paging.access(1, 256).unwrap();
        assert_eq!(paging.resident_pages(1).unwrap(), 2);

        // Re-initialization hands both frames back to the pool
        paging.init_process(1, 1024).unwrap();
        assert_eq!(paging.resident_pages(1).unwrap(), 0);
        assert_ownership(&paging);

        // A second process can immediately claim both frames
        paging.init_process(2, 512).unwrap();
        paging.access(2, 0).unwrap();
        paging.access(2, 256).unwrap();
        assert_eq!(paging.faults(), 4);
        assert_eq!(paging.resident_pages(2).unwrap(), 2);
        assert_ownership(&paging);
    }
}
