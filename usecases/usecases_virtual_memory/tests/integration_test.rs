//! Integration tests for usecases_virtual_memory
//!
//! These tests run multi-process access patterns against the shared
//! frame pool and verify the reporting surface.

use usecases_virtual_memory::PagingManager;

#[test]
fn test_four_pages_two_frames_faulting_walk() {
    let mut paging = PagingManager::new(512, 256, 100).unwrap();
    paging.init_process(1, 1024).unwrap();

    // Pages 0,1 fill the pool; page 2 evicts page 0
    assert_eq!(paging.access(1, 0).unwrap(), 0);
    assert_eq!(paging.access(1, 256).unwrap(), 256);
    assert_eq!(paging.access(1, 512).unwrap(), 0);

    // Page 0 is gone, so touching it faults again
    paging.access(1, 0).unwrap();
    assert_eq!(paging.faults(), 4);
    assert_eq!(paging.hits(), 0);
    assert_eq!(paging.penalty_cycles(), 400);
}

#[test]
fn test_processes_compete_for_one_pool() {
    let mut paging = PagingManager::new(1024, 256, 0).unwrap();
    paging.init_process(1, 1024).unwrap();
    paging.init_process(2, 1024).unwrap();

    for page in 0..4 {
        paging.access(1, page * 256).unwrap();
    }
    assert_eq!(paging.resident_pages(1).unwrap(), 4);

    // Process 2 pushes process 1 out one page at a time
    for page in 0..4 {
        paging.access(2, page * 256).unwrap();
    }
    assert_eq!(paging.resident_pages(1).unwrap(), 0);
    assert_eq!(paging.resident_pages(2).unwrap(), 4);
    assert_eq!(paging.faults(), 8);
    assert_eq!(paging.total_frames(), 4);
}

#[test]
fn test_reporting_surface() {
    let mut paging = PagingManager::new(512, 256, 25).unwrap();
    paging.init_process(3, 512).unwrap();
    paging.init_process(9, 512).unwrap();

    paging.access(3, 0).unwrap();
    paging.access(3, 10).unwrap();
    paging.access(9, 300).unwrap();

    assert_eq!(paging.processes().collect::<Vec<_>>(), vec![3, 9]);
    assert_eq!(paging.hits(), 1);
    assert_eq!(paging.faults(), 2);
    assert_eq!(paging.penalty_cycles(), 50);
    assert_eq!(paging.page_size(), 256);

    let table = paging.page_table(9).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table[1].valid);
    assert!(!table[0].valid);
    assert!(paging.page_table(4).is_err());
}
