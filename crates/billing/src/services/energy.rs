use debtview_core::{BillingPeriod, CustomerId};
use debtview_energy::EnergyConsumptionRecord;

use crate::error::ServiceResult;
use crate::ports::EnergyConsumptionReader;

/// Read-only energy consumption queries.
#[derive(Debug, Clone)]
pub struct EnergyQueryService<E> {
    reader: E,
}

impl<E: EnergyConsumptionReader> EnergyQueryService<E> {
    pub fn new(reader: E) -> Self {
        Self { reader }
    }

    pub fn list_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> ServiceResult<Vec<EnergyConsumptionRecord>> {
        Ok(self.reader.find_by_customer(customer_id)?)
    }

    pub fn list_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> ServiceResult<Vec<EnergyConsumptionRecord>> {
        Ok(self.reader.find_by_customer_and_period(customer_id, period)?)
    }

    pub fn list_elevated(
        &self,
        customer_id: &CustomerId,
    ) -> ServiceResult<Vec<EnergyConsumptionRecord>> {
        Ok(self.reader.find_elevated(customer_id)?)
    }
}
