use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use debtview_core::{BillingPeriod, CustomerId, EnergyQuantity, InvoiceId, Money, WaterQuantity};
use debtview_energy::EnergyConsumptionRecord;
use debtview_invoicing::{Invoice, NewInvoice};

pub(crate) const CUSTOMER: &str = "0001234567";
pub(crate) const OTHER_CUSTOMER: &str = "0009876543";

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn customer(raw: &str) -> CustomerId {
    CustomerId::new(raw).unwrap()
}

pub(crate) fn period(raw: &str) -> BillingPeriod {
    BillingPeriod::new(raw).unwrap()
}

/// Pending invoice issued at [`now`].
pub(crate) fn invoice(
    id: u64,
    customer_id: &str,
    period_raw: &str,
    amount: i64,
    due_date: Option<NaiveDate>,
) -> Invoice {
    Invoice::issue(
        NewInvoice {
            id: InvoiceId::new(id).unwrap(),
            customer_id: customer(customer_id),
            period: period(period_raw),
            consumption: WaterQuantity::new(20).unwrap(),
            amount_due: Money::from_units(amount),
            due_date,
        },
        now(),
    )
    .unwrap()
}

/// `count` pending invoices for distinct synthetic customers, ids 1..=count.
pub(crate) fn pending_invoices(count: u64, due_date: Option<NaiveDate>) -> Vec<Invoice> {
    (1..=count)
        .map(|id| invoice(id, &format!("{id:010}"), "202505", 1_000, due_date))
        .collect()
}

pub(crate) fn energy(customer_id: &str, period_raw: &str, kwh: i64, amount: i64) -> EnergyConsumptionRecord {
    EnergyConsumptionRecord::new(
        customer(customer_id),
        period(period_raw),
        EnergyQuantity::new(kwh).unwrap(),
        Money::from_units(amount),
        date(2025, 5, 28),
        Some("3".to_string()),
    )
}
