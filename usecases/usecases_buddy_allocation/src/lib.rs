//! Use Cases Layer: Buddy Allocation
//!
//! Provides the binary buddy allocator of the memory simulator: per-order
//! free lists over `[0, total)` with power-of-two splitting on allocate
//! and buddy merging on free.
//!
//! ## Overview
//!
//! The `usecases_buddy_allocation` crate implements the second of the two
//! mutually exclusive physical backends. Every allocatable unit has size
//! `min_block_size * 2^order`, every address is aligned to its own block
//! size, and every address is tracked in exactly one place: a free list
//! or the allocation table.
//!
//! Rounding every grant up to a power of two means this allocator never
//! fragments externally; the waste it does exhibit is internal, the gap
//! between granted and requested bytes.
//!
//! ## Examples
//!
//! ```rust
//! use usecases_buddy_allocation::BuddyAllocator;
//!
//! let mut buddy = BuddyAllocator::new(1024, 128).unwrap();
//! let addr = buddy.allocate(200).unwrap();
//! assert_eq!(addr, 0);
//! buddy.free(addr).unwrap();
//! assert_eq!(buddy.used_memory(), 0);
//! ```

pub mod buddy;

pub use buddy::{BuddyAllocation, BuddyAllocator};
