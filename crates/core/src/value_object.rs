//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**; two instances with the same attribute
/// values are interchangeable. In the stock engine, `Quantity` and ledger
/// query filters are value objects.
///
/// The trait requires:
/// - **Clone**: values are cheap to copy
/// - **PartialEq**: values are compared by their attributes
/// - **Debug**: values show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
