//! Persistence and lookup interfaces consumed by the services.
//!
//! Adapters must be shareable across request handlers, hence `Send + Sync`.

use std::sync::Arc;

use debtview_core::{BillingPeriod, CustomerId, InvoiceId};
use debtview_energy::EnergyConsumptionRecord;
use debtview_invoicing::Invoice;

use crate::error::RepositoryResult;

/// Zero-based page of a stable ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_mul(self.size)
    }

    /// Index one past the last element of this page.
    pub fn end(&self) -> usize {
        self.offset().saturating_add(self.size)
    }
}

/// Invoice storage.
///
/// `save`/`save_all` enforce optimistic concurrency: the invoice's version must
/// match the stored one, and the stored version is bumped on success.
pub trait InvoiceRepository: Send + Sync {
    fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
    fn find_by_customer(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<Invoice>>;
    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Option<Invoice>>;
    /// `PENDING` invoices only, ordered by id.
    fn find_pending_page(&self, page: PageRequest) -> RepositoryResult<Vec<Invoice>>;
    /// Whether `PENDING` invoices exist beyond `page`.
    fn has_more_pending(&self, page: PageRequest) -> RepositoryResult<bool>;
    /// Returns the invoice as stored, carrying its new version.
    fn save(&self, invoice: &Invoice) -> RepositoryResult<Invoice>;
    /// All-or-nothing batch write.
    fn save_all(&self, invoices: &[Invoice]) -> RepositoryResult<Vec<Invoice>>;
    fn flush(&self) -> RepositoryResult<()>;
}

/// Read-only access to billed energy usage.
pub trait EnergyConsumptionReader: Send + Sync {
    fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>>;
    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>>;
    /// Records above the elevated usage threshold (more than 500 kWh).
    fn find_elevated(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>>;
}

impl<R> InvoiceRepository for Arc<R>
where
    R: InvoiceRepository + ?Sized,
{
    fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        (**self).find_by_id(id)
    }

    fn find_by_customer(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<Invoice>> {
        (**self).find_by_customer(customer_id)
    }

    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Option<Invoice>> {
        (**self).find_by_customer_and_period(customer_id, period)
    }

    fn find_pending_page(&self, page: PageRequest) -> RepositoryResult<Vec<Invoice>> {
        (**self).find_pending_page(page)
    }

    fn has_more_pending(&self, page: PageRequest) -> RepositoryResult<bool> {
        (**self).has_more_pending(page)
    }

    fn save(&self, invoice: &Invoice) -> RepositoryResult<Invoice> {
        (**self).save(invoice)
    }

    fn save_all(&self, invoices: &[Invoice]) -> RepositoryResult<Vec<Invoice>> {
        (**self).save_all(invoices)
    }

    fn flush(&self) -> RepositoryResult<()> {
        (**self).flush()
    }
}

impl<R> EnergyConsumptionReader for Arc<R>
where
    R: EnergyConsumptionReader + ?Sized,
{
    fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        (**self).find_by_customer(customer_id)
    }

    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        (**self).find_by_customer_and_period(customer_id, period)
    }

    fn find_elevated(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        (**self).find_elevated(customer_id)
    }
}
