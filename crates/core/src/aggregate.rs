//! Aggregate root trait for in-memory domain models.

/// Aggregate root marker + minimal interface.
///
/// An aggregate owns a cluster of related entities and is the only way to
/// mutate them, so cross-entity invariants can be enforced in one place.
/// Aggregates must not perform IO; persistence is sequenced by the caller.
pub trait AggregateRoot {
    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per operation that changed state. Operations that
    /// turn out to be no-ops (idempotent repeats, deleting a missing id) and
    /// failed operations leave it untouched, so callers can compare versions
    /// to decide whether anything needs saving.
    fn version(&self) -> u64;
}
