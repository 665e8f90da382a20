//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two emails with
/// the same text are the same email. To "modify" one, build a new one, which
/// re-runs its validation.
///
/// - **Value Object**: `Email`, `Age` (no identity)
/// - **Entity**: `Student`, `Course` (identity via their id)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
