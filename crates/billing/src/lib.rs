//! Application layer: ports, adapters for tests/dev, and use-case services.
//!
//! - `ports`: the read/write interfaces the use cases consume
//! - `memory`: in-memory port implementations (tests, dev, file-backed data)
//! - `services/`: the use cases exposed to the HTTP layer
//! - `clock`: the time source every "now"-dependent rule reads from

pub mod clock;
pub mod error;
pub mod memory;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{RepositoryError, RepositoryResult, ServiceError, ServiceResult};
pub use memory::{InMemoryEnergyReader, InMemoryInvoiceRepository};
pub use ports::{EnergyConsumptionReader, InvoiceRepository, PageRequest};
pub use services::{
    DebtQueryService, EnergyQueryService, InvoiceService, OVERDUE_CONFLICT_RETRIES,
    OVERDUE_PAGE_SIZE, OverdueMarkingReport,
};
