use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use debtview_core::{AggregateRoot, BillingPeriod, CustomerId, DomainError, InvoiceId, Money};
use debtview_invoicing::Invoice;

use crate::clock::Clock;
use crate::error::{RepositoryError, ServiceResult};
use crate::ports::{InvoiceRepository, PageRequest};

/// Batch size of the overdue sweep.
pub const OVERDUE_PAGE_SIZE: usize = 100;
/// Consecutive batch-write conflicts the sweep absorbs before giving up.
pub const OVERDUE_CONFLICT_RETRIES: usize = 3;

/// Outcome of one overdue sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdueMarkingReport {
    /// Non-empty pages read.
    pub pages: usize,
    /// Invoices examined; a page read twice counts twice.
    pub scanned: usize,
    /// Invoices moved to `OVERDUE`.
    pub marked: usize,
    /// Batch writes rejected by a concurrent update and retried.
    pub conflicts: usize,
}

/// Invoice lifecycle use cases.
#[derive(Debug, Clone)]
pub struct InvoiceService<R, C> {
    repository: R,
    clock: C,
    page_size: usize,
}

impl<R, C> InvoiceService<R, C>
where
    R: InvoiceRepository,
    C: Clock,
{
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            page_size: OVERDUE_PAGE_SIZE,
        }
    }

    /// Override the sweep batch size (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn get_invoice(&self, id: InvoiceId) -> ServiceResult<Invoice> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("invoice not found: {id}")).into())
    }

    pub fn list_by_customer(&self, customer_id: &CustomerId) -> ServiceResult<Vec<Invoice>> {
        Ok(self.repository.find_by_customer(customer_id)?)
    }

    /// At most one element: (customer, period) is unique.
    pub fn list_by_customer_and_period(
        &self,
        customer_id: &CustomerId,
        period: &BillingPeriod,
    ) -> ServiceResult<Vec<Invoice>> {
        Ok(self
            .repository
            .find_by_customer_and_period(customer_id, period)?
            .into_iter()
            .collect())
    }

    pub fn register_payment(&self, id: InvoiceId) -> ServiceResult<Invoice> {
        self.modify(id, "payment registered", |invoice, now| {
            invoice.register_payment(now)
        })
    }

    pub fn void_invoice(&self, id: InvoiceId) -> ServiceResult<Invoice> {
        self.modify(id, "invoice voided", |invoice, now| invoice.void(now))
    }

    pub fn update_amount(&self, id: InvoiceId, amount: Money) -> ServiceResult<Invoice> {
        self.modify(id, "invoice amount updated", |invoice, now| {
            invoice.update_amount(amount, now)
        })
    }

    /// Load, transition, save. Domain rejections leave storage untouched.
    fn modify<F>(&self, id: InvoiceId, action: &'static str, transition: F) -> ServiceResult<Invoice>
    where
        F: FnOnce(&mut Invoice, DateTime<Utc>) -> Result<(), DomainError>,
    {
        let mut invoice = self.get_invoice(id)?;
        transition(&mut invoice, self.clock.now())?;
        let stored = self.repository.save(&invoice)?;
        info!(invoice_id = %id, status = %stored.status(), version = stored.version(), "{action}");
        Ok(stored)
    }

    /// Move every past-due `PENDING` invoice to `OVERDUE`, one page at a time.
    ///
    /// Only invoices that actually transitioned are written, as one batch per
    /// page followed by a flush. A page that produced writes is read again at
    /// the same page number, since the written invoices left the pending set
    /// and later invoices moved up into it. The cursor advances past a page
    /// only when it produced no writes and the repository reports more pending
    /// invoices.
    ///
    /// A batch rejected with a version conflict (typically a payment that landed
    /// mid-sweep) is dropped and its page read again with fresh copies, up to
    /// [`OVERDUE_CONFLICT_RETRIES`] times in a row.
    pub fn mark_overdue_invoices(&self) -> ServiceResult<OverdueMarkingReport> {
        let today = self.clock.today();
        let now = self.clock.now();
        let mut report = OverdueMarkingReport::default();
        let mut page_number = 0usize;
        let mut conflicts_in_a_row = 0usize;

        info!(page_size = self.page_size, %today, "overdue sweep started");

        loop {
            let page = PageRequest::new(page_number, self.page_size);
            let pending = self.repository.find_pending_page(page)?;
            if pending.is_empty() {
                debug!(page = page_number, "no pending invoices left on page");
                break;
            }

            report.pages += 1;
            report.scanned += pending.len();
            let scanned = pending.len();

            let transitioned: Vec<Invoice> = pending
                .into_iter()
                .filter_map(|mut invoice| {
                    if invoice.mark_overdue_if_applicable(today, now) {
                        debug!(invoice_id = %invoice.id_typed(), "invoice past due, marking overdue");
                        Some(invoice)
                    } else {
                        None
                    }
                })
                .collect();

            if !transitioned.is_empty() {
                match self.repository.save_all(&transitioned) {
                    Ok(_) => conflicts_in_a_row = 0,
                    Err(RepositoryError::Conflict(reason))
                        if conflicts_in_a_row < OVERDUE_CONFLICT_RETRIES =>
                    {
                        conflicts_in_a_row += 1;
                        report.conflicts += 1;
                        warn!(
                            page = page_number,
                            %reason,
                            attempt = conflicts_in_a_row,
                            "overdue batch conflicted with a concurrent update, re-reading page"
                        );
                        continue;
                    }
                    Err(e) => {
                        warn!(page = page_number, error = %e, "overdue batch write failed");
                        return Err(e.into());
                    }
                }
                self.repository.flush()?;
                report.marked += transitioned.len();
                debug!(
                    page = page_number,
                    marked = transitioned.len(),
                    scanned,
                    "overdue batch written"
                );
                continue;
            }

            if !self.repository.has_more_pending(page)? {
                break;
            }
            page_number += 1;
        }

        info!(
            pages = report.pages,
            scanned = report.scanned,
            marked = report.marked,
            conflicts = report.conflicts,
            "overdue sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Duration;
    use debtview_invoicing::InvoiceStatus;

    use super::*;
    use crate::clock::FixedClock;
    use crate::error::{RepositoryResult, ServiceError};
    use crate::fixtures::*;
    use crate::memory::InMemoryInvoiceRepository;

    fn service(
        invoices: Vec<Invoice>,
    ) -> (
        InvoiceService<Arc<InMemoryInvoiceRepository>, Arc<FixedClock>>,
        Arc<InMemoryInvoiceRepository>,
        Arc<FixedClock>,
    ) {
        let repo = Arc::new(InMemoryInvoiceRepository::with_invoices(invoices).unwrap());
        let clock = Arc::new(FixedClock::new(now()));
        (
            InvoiceService::new(repo.clone(), clock.clone()),
            repo,
            clock,
        )
    }

    fn id(raw: u64) -> InvoiceId {
        InvoiceId::new(raw).unwrap()
    }

    fn yesterday() -> chrono::NaiveDate {
        now().date_naive() - Duration::days(1)
    }

    fn next_week() -> chrono::NaiveDate {
        now().date_naive() + Duration::days(7)
    }

    fn pending_count(repo: &InMemoryInvoiceRepository) -> usize {
        repo.find_pending_page(PageRequest::new(0, usize::MAX)).unwrap().len()
    }

    #[test]
    fn get_invoice_reports_missing_ids() {
        let (service, _, _) = service(vec![]);
        let err = service.get_invoice(id(42)).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
    }

    #[test]
    fn payment_is_persisted_with_new_version() {
        let (service, repo, _) = service(vec![invoice(1, CUSTOMER, "202505", 95_000, None)]);

        let paid = service.register_payment(id(1)).unwrap();
        assert_eq!(paid.status(), InvoiceStatus::Paid);
        assert_eq!(paid.version(), 2);
        assert_eq!(paid.updated_at(), now());
        assert!(repo.find_by_id(id(1)).unwrap().unwrap().is_paid());

        let err = service.register_payment(id(1)).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidState(_))));
    }

    #[test]
    fn void_then_pay_is_rejected_and_nothing_is_written() {
        let (service, repo, _) = service(vec![invoice(1, CUSTOMER, "202505", 100, None)]);
        service.void_invoice(id(1)).unwrap();
        let before = repo.find_by_id(id(1)).unwrap().unwrap();

        assert!(service.register_payment(id(1)).is_err());
        assert_eq!(repo.find_by_id(id(1)).unwrap().unwrap(), before);
    }

    #[test]
    fn update_amount_rules() {
        let (service, _, _) = service(vec![invoice(1, CUSTOMER, "202505", 100, None)]);

        let updated = service
            .update_amount(id(1), Money::parse("123.45").unwrap())
            .unwrap();
        assert_eq!(updated.amount_due().to_string(), "123.45");

        let err = service
            .update_amount(id(1), Money::from_units(-1))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidArgument(_))));

        service.register_payment(id(1)).unwrap();
        let err = service
            .update_amount(id(1), Money::from_units(5))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidState(_))));
    }

    #[test]
    fn listing_by_customer_and_period() {
        let (service, _, _) = service(vec![
            invoice(1, CUSTOMER, "202504", 100, None),
            invoice(2, CUSTOMER, "202505", 100, None),
        ]);
        let customer_id = customer(CUSTOMER);

        assert_eq!(service.list_by_customer(&customer_id).unwrap().len(), 2);
        let listed = service
            .list_by_customer_and_period(&customer_id, &period("202505"))
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id_typed(), id(2));
        assert!(
            service
                .list_by_customer_and_period(&customer_id, &period("202501"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn sweep_marks_every_past_due_invoice_across_pages() {
        let (service, repo, _) = service(pending_invoices(250, Some(yesterday())));

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.marked, 250);
        assert_eq!(report.scanned, 250);
        assert_eq!(report.pages, 3);
        assert_eq!(repo.flush_count(), 3);
        assert_eq!(pending_count(&repo), 0);
    }

    #[test]
    fn sweep_does_not_skip_invoices_that_shift_pages() {
        // 110 past due: after the first write, the last 10 move onto page 0
        let (service, repo, _) = service(pending_invoices(110, Some(yesterday())));

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.marked, 110);
        assert_eq!(pending_count(&repo), 0);
    }

    #[test]
    fn sweep_with_mixed_due_dates() {
        let invoices: Vec<Invoice> = (1..=150u64)
            .map(|n| {
                let due = if n % 2 == 1 { yesterday() } else { next_week() };
                invoice(n, &format!("{n:010}"), "202505", 1_000, Some(due))
            })
            .collect();
        let (service, repo, _) = service(invoices);

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.marked, 75);
        assert_eq!(pending_count(&repo), 75);
        for n in 1..=150u64 {
            let stored = repo.find_by_id(id(n)).unwrap().unwrap();
            let expected = if n % 2 == 1 {
                InvoiceStatus::Overdue
            } else {
                InvoiceStatus::Pending
            };
            assert_eq!(stored.status(), expected, "invoice {n}");
        }
    }

    #[test]
    fn sweep_advances_past_pages_without_transitions() {
        let mut invoices = pending_invoices(120, Some(next_week()));
        invoices.push(invoice(121, "0000000121", "202505", 1_000, Some(yesterday())));
        let (service, repo, _) = service(invoices);
        let service = service.with_page_size(50);

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.marked, 1);
        assert_eq!(
            repo.find_by_id(id(121)).unwrap().unwrap().status(),
            InvoiceStatus::Overdue
        );
    }

    #[test]
    fn sweep_is_idempotent_and_follows_the_clock() {
        let (service, repo, clock) = service(pending_invoices(3, Some(next_week())));

        assert_eq!(service.mark_overdue_invoices().unwrap().marked, 0);
        assert_eq!(repo.flush_count(), 0);

        clock.advance(Duration::days(8));
        assert_eq!(service.mark_overdue_invoices().unwrap().marked, 3);
        assert_eq!(service.mark_overdue_invoices().unwrap().marked, 0);
    }

    #[test]
    fn sweep_ignores_settled_and_undated_invoices() {
        let mut paid = invoice(1, CUSTOMER, "202501", 100, Some(yesterday()));
        paid.register_payment(now()).unwrap();
        let mut voided = invoice(2, CUSTOMER, "202502", 100, Some(yesterday()));
        voided.void(now()).unwrap();
        let undated = invoice(3, CUSTOMER, "202503", 100, None);
        let due_today = invoice(4, CUSTOMER, "202504", 100, Some(now().date_naive()));
        let (service, repo, _) = service(vec![paid, voided, undated, due_today]);

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.marked, 0);
        assert_eq!(report.scanned, 2);
        assert!(repo.find_by_id(id(1)).unwrap().unwrap().is_paid());
        assert!(repo.find_by_id(id(2)).unwrap().unwrap().is_void());
    }

    #[test]
    fn concurrent_payment_wins_over_stale_sweep_copy() {
        let repo = Arc::new(
            InMemoryInvoiceRepository::with_invoices([invoice(
                1,
                CUSTOMER,
                "202505",
                100,
                Some(yesterday()),
            )])
            .unwrap(),
        );
        let stale = repo.find_by_id(id(1)).unwrap().unwrap();

        let service = InvoiceService::new(repo.clone(), FixedClock::new(now()));
        service.register_payment(id(1)).unwrap();

        let mut overdue = stale;
        assert!(overdue.mark_overdue_if_applicable(now().date_naive(), now()));
        let err = repo.save_all(&[overdue]).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(repo.find_by_id(id(1)).unwrap().unwrap().is_paid());
    }

    /// Pays the next queued invoice through a second writer right before each
    /// batch write, the way a payment request racing the sweep would.
    struct RacingPayments {
        inner: Arc<InMemoryInvoiceRepository>,
        payees: Mutex<Vec<InvoiceId>>,
    }

    impl RacingPayments {
        fn new(inner: Arc<InMemoryInvoiceRepository>, payees: Vec<InvoiceId>) -> Self {
            Self {
                inner,
                payees: Mutex::new(payees),
            }
        }
    }

    impl InvoiceRepository for RacingPayments {
        fn find_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
            self.inner.find_by_id(id)
        }

        fn find_by_customer(&self, customer_id: &CustomerId) -> RepositoryResult<Vec<Invoice>> {
            self.inner.find_by_customer(customer_id)
        }

        fn find_by_customer_and_period(
            &self,
            customer_id: &CustomerId,
            period: &BillingPeriod,
        ) -> RepositoryResult<Option<Invoice>> {
            self.inner.find_by_customer_and_period(customer_id, period)
        }

        fn find_pending_page(&self, page: PageRequest) -> RepositoryResult<Vec<Invoice>> {
            self.inner.find_pending_page(page)
        }

        fn has_more_pending(&self, page: PageRequest) -> RepositoryResult<bool> {
            self.inner.has_more_pending(page)
        }

        fn save(&self, invoice: &Invoice) -> RepositoryResult<Invoice> {
            self.inner.save(invoice)
        }

        fn save_all(&self, invoices: &[Invoice]) -> RepositoryResult<Vec<Invoice>> {
            if let Some(payee) = self.payees.lock().unwrap().pop() {
                let mut current = self.inner.find_by_id(payee)?.unwrap();
                current.register_payment(now()).unwrap();
                self.inner.save(&current)?;
            }
            self.inner.save_all(invoices)
        }

        fn flush(&self) -> RepositoryResult<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn sweep_rereads_page_after_concurrent_payment() {
        let repo = Arc::new(
            InMemoryInvoiceRepository::with_invoices(pending_invoices(5, Some(yesterday())))
                .unwrap(),
        );
        let racing = RacingPayments::new(repo.clone(), vec![id(3)]);
        let service = InvoiceService::new(racing, FixedClock::new(now()));

        let report = service.mark_overdue_invoices().unwrap();
        assert_eq!(report.conflicts, 1);
        assert_eq!(report.marked, 4);
        assert_eq!(pending_count(&repo), 0);
        assert!(repo.find_by_id(id(3)).unwrap().unwrap().is_paid());
        for n in [1, 2, 4, 5] {
            assert_eq!(
                repo.find_by_id(id(n)).unwrap().unwrap().status(),
                InvoiceStatus::Overdue,
                "invoice {n}"
            );
        }
    }

    #[test]
    fn sweep_gives_up_after_repeated_conflicts() {
        let repo = Arc::new(
            InMemoryInvoiceRepository::with_invoices(pending_invoices(5, Some(yesterday())))
                .unwrap(),
        );
        let payees = (1..=(OVERDUE_CONFLICT_RETRIES as u64 + 1)).map(id).collect();
        let racing = RacingPayments::new(repo.clone(), payees);
        let service = InvoiceService::new(racing, FixedClock::new(now()));

        let err = service.mark_overdue_invoices().unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Conflict(_))));
        assert_eq!(repo.flush_count(), 0);
        assert_eq!(pending_count(&repo), 5 - (OVERDUE_CONFLICT_RETRIES + 1));
    }
}
