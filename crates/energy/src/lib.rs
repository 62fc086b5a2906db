//! Energy billing domain module.
//!
//! Energy consumption records are produced wholesale by external systems (the
//! legacy fixed-width export, a relational reader) and are never mutated here.

pub mod record;

pub use record::EnergyConsumptionRecord;
