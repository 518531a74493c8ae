//! Aggregate root trait.

/// Aggregate root marker + minimal interface.
///
/// An aggregate is the consistency boundary: every invariant-preserving
/// mutation goes through its root, and nothing outside holds a mutable
/// reference to its parts.
///
/// Aggregates perform no locking. Concurrent read-modify-save cycles on the
/// same aggregate must be serialized by the caller; stores keep the last
/// saved value.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;
}
