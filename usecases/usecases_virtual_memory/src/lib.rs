//! Use Cases Layer: Virtual Memory
//!
//! Provides the demand-paging manager of the memory simulator: one page
//! table per simulated process over a single shared pool of physical
//! frames, with global least-recently-used eviction.
//!
//! ## Overview
//!
//! The `usecases_virtual_memory` crate is orthogonal to the physical
//! backends: it translates virtual addresses regardless of which
//! allocator a session runs. All processes compete for the same frame
//! pool; eviction picks the globally least recently used frame by logical
//! access time, never per process.
//!
//! A page moves from unmapped to mapped on its first successful access
//! and stays mapped until it is evicted or the whole manager is replaced.
//! There is no explicit unmap operation.
//!
//! ## Examples
//!
//! ```rust
//! use usecases_virtual_memory::PagingManager;
//!
//! let mut paging = PagingManager::new(512, 256, 100).unwrap();
//! paging.init_process(1, 1024).unwrap();
//! let paddr = paging.access(1, 0).unwrap();
//! assert_eq!(paddr, 0);
//! assert_eq!(paging.faults(), 1);
//! ```

pub mod paging;

pub use paging::{PageTableEntry, PagingManager, ProcessId};
