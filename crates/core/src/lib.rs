//! `debtview-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, identifiers, and the self-validating value types shared by
//! the water invoicing and energy billing modules.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod period;
pub mod quantity;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, InvoiceId};
pub use money::Money;
pub use period::BillingPeriod;
pub use quantity::{ConsumptionLevel, EnergyQuantity, WaterQuantity};
pub use value_object::ValueObject;
