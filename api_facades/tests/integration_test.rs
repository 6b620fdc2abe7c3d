//! Integration tests for api_facades
//!
//! These tests drive whole operator sessions end to end: allocation
//! scenarios, backend switching, paging and comparison reports.

use api_facades::{PhysicalBackend, SessionConfig, SimulatorSession};
use entities_memory_model::{FitPolicy, SimulationError};

#[test]
fn test_first_fit_session_scenario() {
    let mut session = SimulatorSession::with_defaults().unwrap();

    assert_eq!(session.allocate(300, FitPolicy::FirstFit).unwrap(), 0);
    assert_eq!(session.allocate(300, FitPolicy::FirstFit).unwrap(), 300);
    session.free(0).unwrap();
    assert_eq!(session.allocate(200, FitPolicy::FirstFit).unwrap(), 0);

    let stats = session.stats();
    assert_eq!(stats.external_fragmentation, 100.0);
    assert_eq!(stats.internal_fragmentation, 0.0);
    assert_eq!(stats.recorded_events, 4);
    assert_eq!(stats.allocation.successes, 3);
}

#[test]
fn test_buddy_session_merge_cycle() {
    let mut session = SimulatorSession::with_defaults().unwrap();
    session.init_buddy(1024, 128).unwrap();

    let a = session.allocate(200, FitPolicy::FirstFit).unwrap();
    let b = session.allocate(100, FitPolicy::FirstFit).unwrap();
    assert_eq!((a, b), (0, 256));

    session.free(a).unwrap();
    session.free(b).unwrap();

    match session.backend() {
        PhysicalBackend::Buddy(buddy) => {
            assert_eq!(buddy.used_memory(), 0);
            assert_eq!(buddy.free_lists()[buddy.max_order()].len(), 1);
        }
        other => panic!("expected buddy backend, got {:?}", other),
    }
}

#[test]
fn test_compare_after_recorded_session() {
    let mut session = SimulatorSession::with_defaults().unwrap();
    session.allocate(300, FitPolicy::FirstFit).unwrap();
    session.allocate(300, FitPolicy::FirstFit).unwrap();
    session.free(0).unwrap();
    session.allocate(200, FitPolicy::FirstFit).unwrap();

    let reports = session.compare().unwrap();
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0].external_fragmentation, 100.0);
    assert_eq!(reports[3].external_fragmentation, 0.0);

    // Comparison is read-only: the trace and backend are untouched
    assert_eq!(session.stats().recorded_events, 4);
    assert_eq!(session.stats().allocation.successes, 3);

    session.clear_workload();
    assert_eq!(session.compare(), Err(SimulationError::NoWorkloadRecorded));
}

#[test]
fn test_paging_is_orthogonal_to_backend_switching() {
    let mut session = SimulatorSession::with_defaults().unwrap();
    session.vm_init_process(1, 1024).unwrap();
    session.vm_access(1, 0).unwrap();

    session.init_buddy(1024, 128).unwrap();
    session.vm_access(1, 10).unwrap();

    let stats = session.stats();
    assert_eq!(stats.page_faults, 1);
    assert_eq!(stats.page_hits, 1);
    assert_eq!(stats.total_frames, 2);
}

#[test]
fn test_default_cache_charges_per_touched_address() {
    let config = SessionConfig::default();
    let mut session = SimulatorSession::with_defaults().unwrap();

    session.allocate(100, FitPolicy::BestFit).unwrap();
    session.vm_init_process(1, 512).unwrap();
    session.vm_access(1, 0).unwrap();

    // Two successful address-yielding operations, flat miss cost each
    assert_eq!(session.cache_cycles(), 200);
    assert_eq!(session.config(), config);
}
