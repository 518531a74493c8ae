//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: `Money`,
/// `Currency` and `Address` are defined entirely by their attributes. To
/// "change" one, build a new value and replace the old one wholesale.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
