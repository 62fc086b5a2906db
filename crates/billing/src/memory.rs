//! In-memory port implementations for tests, development, and file-backed data.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use debtview_core::{AggregateRoot, BillingPeriod, CustomerId, ExpectedVersion, InvoiceId};
use debtview_energy::EnergyConsumptionRecord;
use debtview_invoicing::{Invoice, InvoiceStatus};

use crate::error::{RepositoryError, RepositoryResult};
use crate::ports::{EnergyConsumptionReader, InvoiceRepository, PageRequest};

type NaturalKey = (CustomerId, BillingPeriod);

#[derive(Debug, Default)]
struct InvoiceTables {
    by_id: BTreeMap<InvoiceId, Invoice>,
    by_customer_period: HashMap<NaturalKey, InvoiceId>,
}

impl InvoiceTables {
    /// Validate a write and return the version it would be stored at.
    fn check(&self, invoice: &Invoice) -> RepositoryResult<u64> {
        let id = invoice.id_typed();
        let stored_version = self.by_id.get(&id).map(|stored| stored.version()).unwrap_or(0);
        ExpectedVersion::Exact(invoice.version()).check(stored_version)?;

        if let Some(owner) = self.by_customer_period.get(&natural_key(invoice)) {
            if *owner != id {
                return Err(RepositoryError::conflict(format!(
                    "invoice {owner} already exists for customer {} and period {}",
                    invoice.customer_id(),
                    invoice.period()
                )));
            }
        }

        Ok(stored_version + 1)
    }

    fn apply(&mut self, invoice: &Invoice, version: u64) -> Invoice {
        let stored = invoice.clone().with_version(version);
        self.by_customer_period
            .insert(natural_key(&stored), stored.id_typed());
        self.by_id.insert(stored.id_typed(), stored.clone());
        stored
    }

    fn pending(&self) -> impl Iterator<Item = &Invoice> {
        self.by_id
            .values()
            .filter(|invoice| invoice.status() == InvoiceStatus::Pending)
    }
}

fn natural_key(invoice: &Invoice) -> NaturalKey {
    (invoice.customer_id().clone(), invoice.period().clone())
}

fn poisoned() -> RepositoryError {
    RepositoryError::unavailable("invoice store lock poisoned")
}

/// Invoice store backed by an ordered map.
///
/// Stored versions start at 1; a fresh invoice (version 0) is an insert.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    inner: RwLock<InvoiceTables>,
    flushes: AtomicU64,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-populated with `invoices`.
    pub fn with_invoices(invoices: impl IntoIterator<Item = Invoice>) -> RepositoryResult<Self> {
        let repo = Self::new();
        let invoices: Vec<Invoice> = invoices.into_iter().collect();
        repo.save_all(&invoices)?;
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|t| t.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let tables = self.inner.read().map_err(|_| poisoned())?;
        Ok(tables.by_id.get(&id).cloned())
    }

    fn find_by_customer(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<Invoice>> {
        let tables = self.inner.read().map_err(|_| poisoned())?;
        Ok(tables
            .by_id
            .values()
            .filter(|invoice| invoice.customer_id() == customer_id)
            .cloned()
            .collect())
    }

    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Option<Invoice>> {
        let tables = self.inner.read().map_err(|_| poisoned())?;
        let key = (customer_id.clone(), period.clone());
        Ok(tables
            .by_customer_period
            .get(&key)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    fn find_pending_page(&self, page: PageRequest) -> RepositoryResult<Vec<Invoice>> {
        let tables = self.inner.read().map_err(|_| poisoned())?;
        Ok(tables
            .pending()
            .skip(page.offset())
            .take(page.size)
            .cloned()
            .collect())
    }

    fn has_more_pending(&self, page: PageRequest) -> RepositoryResult<bool> {
        let tables = self.inner.read().map_err(|_| poisoned())?;
        Ok(tables.pending().nth(page.end()).is_some())
    }

    fn save(&self, invoice: &Invoice) -> RepositoryResult<Invoice> {
        let mut tables = self.inner.write().map_err(|_| poisoned())?;
        let version = tables.check(invoice)?;
        Ok(tables.apply(invoice, version))
    }

    fn save_all(&self, invoices: &[Invoice]) -> RepositoryResult<Vec<Invoice>> {
        let mut tables = self.inner.write().map_err(|_| poisoned())?;

        let mut ids = HashSet::with_capacity(invoices.len());
        let mut keys = HashSet::with_capacity(invoices.len());
        let mut versions = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            if !ids.insert(invoice.id_typed()) {
                return Err(RepositoryError::conflict(format!(
                    "invoice {} appears twice in one batch",
                    invoice.id_typed()
                )));
            }
            if !keys.insert(natural_key(invoice)) {
                return Err(RepositoryError::conflict(format!(
                    "batch holds two invoices for customer {} and period {}",
                    invoice.customer_id(),
                    invoice.period()
                )));
            }
            versions.push(tables.check(invoice)?);
        }

        Ok(invoices
            .iter()
            .zip(versions)
            .map(|(invoice, version)| tables.apply(invoice, version))
            .collect())
    }

    fn flush(&self) -> RepositoryResult<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Energy records held in memory, typically loaded once from the legacy file.
#[derive(Debug, Default)]
pub struct InMemoryEnergyReader {
    records: RwLock<Vec<EnergyConsumptionRecord>>,
}

impl InMemoryEnergyReader {
    pub fn new(records: Vec<EnergyConsumptionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Swap in a freshly loaded record set.
    pub fn replace(&self, records: Vec<EnergyConsumptionRecord>) -> RepositoryResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| RepositoryError::unavailable("energy record lock poisoned"))?;
        *guard = records;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(
        &self,
        predicate: impl Fn(&EnergyConsumptionRecord) -> bool,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::unavailable("energy record lock poisoned"))?;
        Ok(records.iter().filter(|r| predicate(r)).cloned().collect())
    }
}

impl EnergyConsumptionReader for InMemoryEnergyReader {
    fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        self.select(|r| r.customer_id() == customer_id)
    }

    fn find_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        self.select(|r| r.customer_id() == customer_id && r.period() == period)
    }

    fn find_elevated(
        &self,
        customer_id: &CustomerId,
    ) -> RepositoryResult<Vec<EnergyConsumptionRecord>> {
        self.select(|r| r.customer_id() == customer_id && r.is_high_consumption())
    }
}
