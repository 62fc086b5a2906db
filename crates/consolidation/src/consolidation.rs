use chrono::{DateTime, NaiveDate, Utc};
use debtview_core::{CustomerId, DomainResult, Money};
use debtview_energy::EnergyConsumptionRecord;
use debtview_invoicing::{Invoice, InvoiceStatus};

use crate::alert::{DUE_SOON_WINDOW_DAYS, DebtAlert};
use crate::statistics::{DebtStatistics, mean};

/// A customer's consolidated debt across water and energy services.
///
/// Recomputed on every query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtConsolidation {
    customer_id: CustomerId,
    computed_at: DateTime<Utc>,
    invoices: Vec<Invoice>,
    energy_records: Vec<EnergyConsumptionRecord>,
    water_debt: Money,
    energy_debt: Money,
    grand_total: Money,
    alerts: Vec<DebtAlert>,
    statistics: DebtStatistics,
}

/// Reduce a customer's invoices and energy records into a [`DebtConsolidation`].
///
/// - Water debt sums every invoice that is not `PAID`. `VOID` invoices are
///   counted as well; that is the established behaviour and is kept as is.
/// - Energy debt sums every supplied record (records have no payment state).
/// - Alerts and due-date statistics are evaluated against `now`'s date.
///
/// Fails with a validation error only when a total leaves the range `Money`
/// can represent.
pub fn consolidate(
    customer_id: CustomerId,
    invoices: Vec<Invoice>,
    energy_records: Vec<EnergyConsumptionRecord>,
    now: DateTime<Utc>,
) -> DomainResult<DebtConsolidation> {
    let today = now.date_naive();

    let water_debt = Money::total(
        invoices
            .iter()
            .filter(|i| !i.is_paid())
            .map(Invoice::amount_due),
    )?;
    let energy_debt = Money::total(energy_records.iter().map(EnergyConsumptionRecord::amount_due))?;
    let grand_total = water_debt.plus(energy_debt)?;

    let alerts = alerts_for(&invoices, today);
    let statistics = DebtStatistics {
        total_invoices: invoices.len(),
        overdue_count: count_status(&invoices, InvoiceStatus::Overdue),
        pending_count: count_status(&invoices, InvoiceStatus::Pending),
        average_water_consumption: mean(invoices.iter().map(|i| i.consumption().cubic_meters())),
        water_debt,
        total_energy_records: energy_records.len(),
        average_energy_consumption: mean(
            energy_records
                .iter()
                .map(|r| r.consumption().kilowatt_hours()),
        ),
        energy_debt,
    };

    Ok(DebtConsolidation {
        customer_id,
        computed_at: now,
        invoices,
        energy_records,
        water_debt,
        energy_debt,
        grand_total,
        alerts,
        statistics,
    })
}

fn count_status(invoices: &[Invoice], status: InvoiceStatus) -> usize {
    invoices.iter().filter(|i| i.status() == status).count()
}

fn alerts_for(invoices: &[Invoice], today: NaiveDate) -> Vec<DebtAlert> {
    let mut alerts = Vec::new();

    let overdue = invoices
        .iter()
        .filter(|i| i.is_overdue(today) || i.is_marked_overdue())
        .count();
    if overdue > 0 {
        alerts.push(DebtAlert::OverdueInvoices { count: overdue });
    }

    let due_soon = invoices
        .iter()
        .filter(|i| i.is_pending())
        .filter(|i| (1..=DUE_SOON_WINDOW_DAYS).contains(&i.days_until_due(today)))
        .count();
    if due_soon > 0 {
        alerts.push(DebtAlert::InvoicesDueSoon { count: due_soon });
    }

    alerts
}

impl DebtConsolidation {
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn energy_records(&self) -> &[EnergyConsumptionRecord] {
        &self.energy_records
    }

    pub fn water_debt(&self) -> Money {
        self.water_debt
    }

    pub fn energy_debt(&self) -> Money {
        self.energy_debt
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn alerts(&self) -> &[DebtAlert] {
        &self.alerts
    }

    /// Alerts rendered as customer-facing messages, in order.
    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(ToString::to_string).collect()
    }

    pub fn statistics(&self) -> &DebtStatistics {
        &self.statistics
    }

    pub fn has_debt(&self) -> bool {
        !self.grand_total.is_zero()
    }

    pub fn has_overdue_invoices(&self) -> bool {
        self.invoices.iter().any(Invoice::is_marked_overdue)
    }

    pub fn overdue_invoices(&self) -> Vec<&Invoice> {
        self.invoices.iter().filter(|i| i.is_marked_overdue()).collect()
    }
}
