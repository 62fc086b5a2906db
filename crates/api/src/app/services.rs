use std::sync::Arc;

use debtview_billing::{
    Clock, DebtQueryService, EnergyConsumptionReader, EnergyQueryService, InvoiceRepository,
    InvoiceService, SystemClock,
};
use debtview_infra::Stores;

pub type SharedInvoices = Arc<dyn InvoiceRepository>;
pub type SharedEnergy = Arc<dyn EnergyConsumptionReader>;
pub type SharedClock = Arc<dyn Clock>;

/// Use-case services shared by every handler.
pub struct AppServices {
    pub debts: DebtQueryService<SharedInvoices, SharedEnergy, SharedClock>,
    pub invoices: InvoiceService<SharedInvoices, SharedClock>,
    pub energy: EnergyQueryService<SharedEnergy>,
    clock: SharedClock,
}

impl AppServices {
    pub fn new(invoices: SharedInvoices, energy: SharedEnergy, clock: SharedClock) -> Self {
        Self {
            debts: DebtQueryService::new(invoices.clone(), energy.clone(), clock.clone()),
            invoices: InvoiceService::new(invoices, clock.clone()),
            energy: EnergyQueryService::new(energy),
            clock,
        }
    }

    /// Services over bootstrapped stores, on the system clock.
    pub fn from_stores(stores: Stores) -> Self {
        Self::new(
            Arc::new(stores.invoices),
            Arc::new(stores.energy),
            Arc::new(SystemClock),
        )
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}
