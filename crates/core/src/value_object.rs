//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two date windows
/// covering the same days are the same window. To "modify" one, build a new
/// one (e.g. `DateBounds::clamp` returns a fresh `DateWindow`).
///
/// The trait requires:
/// - **Clone**: values are cheap to copy
/// - **PartialEq**: compared by attribute values
/// - **Debug**: loggable and testable
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
