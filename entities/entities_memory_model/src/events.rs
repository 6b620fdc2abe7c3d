//! Workload Events and Placement Policies
//!
//! A session records every allocate/free attempt as a [`WorkloadEvent`] so
//! the replay engine can re-execute the exact attempt stream against a
//! different backend later.

/// Rule selecting which free block satisfies a contiguous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    /// First qualifying block in address order.
    FirstFit,
    /// Qualifying block of minimal size; ties broken by address order.
    BestFit,
    /// Qualifying block of maximal size; ties broken by address order.
    WorstFit,
}

/// One recorded operation, appended in issue order.
///
/// `Alloc` carries the requested size, `Free` the address the operator
/// freed. Free addresses are replayed verbatim: under a different policy
/// the recorded address may name a block that policy never produced, in
/// which case the replayed free legitimately does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadEvent {
    /// An allocation attempt for the given size.
    Alloc(usize),
    /// A free attempt at the given address.
    Free(usize),
}
