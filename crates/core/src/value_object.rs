//! Value object trait: equality by value, not identity.
//!
//! Every value type in this crate validates its invariant in its constructor
//! and exposes no mutators, so an instance that exists is a valid instance.
//! Two values with the same contents are the same value.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one (e.g. `Money::plus` returns a fresh, re-normalised amount).
///
/// - **Value Object**: `Money`, `BillingPeriod`, `CustomerId`, quantities
/// - **Entity**: `Invoice` (identified by its `InvoiceId`)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
