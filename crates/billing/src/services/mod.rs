//! Use cases exposed to the HTTP layer.

mod debt;
mod energy;
mod invoices;

pub use debt::DebtQueryService;
pub use energy::EnergyQueryService;
pub use invoices::{InvoiceService, OVERDUE_CONFLICT_RETRIES, OVERDUE_PAGE_SIZE, OverdueMarkingReport};
