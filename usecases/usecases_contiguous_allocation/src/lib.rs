//! Use Cases Layer: Contiguous Allocation
//!
//! Provides the contiguous allocator of the memory simulator: an ordered
//! partition of a simulated physical address range with first-fit,
//! best-fit and worst-fit placement and mandatory coalescing on free.
//!
//! ## Overview
//!
//! The `usecases_contiguous_allocation` crate implements one of the two
//! mutually exclusive physical backends a session can run. An
//! [`AddressSpace`] owns an address-ordered sequence of blocks that always
//! partitions `[0, total)` with no gaps, no overlaps, and never two
//! adjacent free blocks.
//!
//! ## Placement Policies
//!
//! - **FirstFit**: the first qualifying free block in address order
//! - **BestFit**: the smallest qualifying free block, ties by address
//! - **WorstFit**: the largest qualifying free block, ties by address
//!
//! ## Examples
//!
//! ```rust
//! use entities_memory_model::FitPolicy;
//! use usecases_contiguous_allocation::AddressSpace;
//!
//! let mut space = AddressSpace::new(1024).unwrap();
//! let addr = space.allocate(300, FitPolicy::FirstFit).unwrap();
//! assert_eq!(addr, 0);
//! space.free(addr).unwrap();
//! ```
//!
//! ## See Also
//!
//! - [`placement`]: the three block-selection rules
//! - [`address_space`]: the partition and its operations

pub mod address_space;
pub mod placement;

pub use address_space::{AddressSpace, Block};
