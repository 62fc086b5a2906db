use tracing::debug;

use debtview_consolidation::{DebtConsolidation, consolidate};
use debtview_core::CustomerId;

use crate::clock::Clock;
use crate::error::ServiceResult;
use crate::ports::{EnergyConsumptionReader, InvoiceRepository};

/// Consolidated debt query across water invoices and energy records.
#[derive(Debug, Clone)]
pub struct DebtQueryService<R, E, C> {
    invoices: R,
    energy: E,
    clock: C,
}

impl<R, E, C> DebtQueryService<R, E, C>
where
    R: InvoiceRepository,
    E: EnergyConsumptionReader,
    C: Clock,
{
    pub fn new(invoices: R, energy: E, clock: C) -> Self {
        Self {
            invoices,
            energy,
            clock,
        }
    }

    /// A customer with no records yields an all-zero consolidation. Totals
    /// beyond the `Money` range surface as a validation error.
    pub fn get_consolidated_debt(&self, customer_id: &CustomerId) -> ServiceResult<DebtConsolidation> {
        let invoices = self.invoices.find_by_customer(customer_id)?;
        let energy_records = self.energy.find_by_customer(customer_id)?;
        debug!(
            customer_id = %customer_id,
            invoices = invoices.len(),
            energy_records = energy_records.len(),
            "consolidating customer debt"
        );
        Ok(consolidate(
            customer_id.clone(),
            invoices,
            energy_records,
            self.clock.now(),
        )?)
    }
}
