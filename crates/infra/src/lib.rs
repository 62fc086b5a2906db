//! Infrastructure layer: configuration, file-backed data sources, bootstrap.

pub mod bootstrap;
pub mod config;
pub mod legacy_energy;
pub mod seed;

pub use bootstrap::{Stores, build_stores};
pub use config::AppConfig;
pub use legacy_energy::{LegacyFileError, LegacyLoadReport, RejectedLine};
pub use seed::SeedError;
