//! Debt consolidation engine.
//!
//! Merges a customer's water invoices and energy records into a single debt
//! view. Pure and deterministic: the only input besides the records is the
//! instant the caller considers "now".

pub mod alert;
pub mod consolidation;
pub mod statistics;

pub use alert::DebtAlert;
pub use consolidation::{DebtConsolidation, consolidate};
pub use statistics::DebtStatistics;
