use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use debtview_core::{
    AggregateRoot, BillingPeriod, CustomerId, DomainError, DomainResult, InvoiceId, Money,
    WaterQuantity,
};

use crate::status::InvoiceStatus;

/// Input for issuing a new water invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub period: BillingPeriod,
    pub consumption: WaterQuantity,
    pub amount_due: Money,
    pub due_date: Option<NaiveDate>,
}

/// Entity: water-service invoice for one customer and billing period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    id: InvoiceId,
    customer_id: CustomerId,
    period: BillingPeriod,
    consumption: WaterQuantity,
    amount_due: Money,
    status: InvoiceStatus,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Invoice {
    /// Issue a new invoice in the initial `PENDING` state.
    pub fn issue(new: NewInvoice, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.amount_due.is_negative() {
            return Err(DomainError::validation("invoice amount must not be negative"));
        }
        Ok(Self {
            id: new.id,
            customer_id: new.customer_id,
            period: new.period,
            consumption: new.consumption,
            amount_due: new.amount_due,
            status: InvoiceStatus::INITIAL,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Rehydrate an invoice from its stored form, validating every field.
    pub fn from_snapshot(snapshot: InvoiceSnapshot) -> DomainResult<Self> {
        let amount_due = Money::new(snapshot.amount_due)?;
        if amount_due.is_negative() {
            return Err(DomainError::validation("invoice amount must not be negative"));
        }
        Ok(Self {
            id: InvoiceId::new(snapshot.id)?,
            customer_id: CustomerId::new(snapshot.customer_id)?,
            period: BillingPeriod::new(snapshot.period)?,
            consumption: WaterQuantity::new(snapshot.consumption_m3)?,
            amount_due,
            status: snapshot.status,
            due_date: snapshot.due_date,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at.unwrap_or(snapshot.created_at),
            version: snapshot.version,
        })
    }

    pub fn to_snapshot(&self) -> InvoiceSnapshot {
        InvoiceSnapshot {
            id: self.id.value(),
            customer_id: self.customer_id.to_string(),
            period: self.period.to_string(),
            consumption_m3: i64::from(self.consumption.cubic_meters()),
            amount_due: self.amount_due.amount(),
            status: self.status,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: Some(self.updated_at),
            version: self.version,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn period(&self) -> &BillingPeriod {
        &self.period
    }

    pub fn consumption(&self) -> WaterQuantity {
        self.consumption
    }

    pub fn amount_due(&self) -> Money {
        self.amount_due
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvoiceStatus::Pending
    }

    pub fn is_void(&self) -> bool {
        self.status == InvoiceStatus::Void
    }

    /// State check only; see [`Invoice::is_overdue`] for the due-date predicate.
    pub fn is_marked_overdue(&self) -> bool {
        self.status == InvoiceStatus::Overdue
    }

    /// True when a due date exists, lies strictly before `today`, and the
    /// invoice is not paid.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.is_paid(),
            None => false,
        }
    }

    /// Signed day count from `today` to the due date (negative once passed,
    /// 0 without a due date).
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        self.due_date
            .map(|due| due.signed_duration_since(today).num_days())
            .unwrap_or(0)
    }

    pub fn register_payment(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.status = self.status.register_payment()?;
        self.updated_at = now;
        Ok(())
    }

    pub fn void(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.status = self.status.void()?;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_amount(&mut self, new_amount: Money, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.permits_amount_change() {
            return Err(DomainError::invalid_state("cannot modify a paid invoice"));
        }
        if new_amount.is_negative() {
            return Err(DomainError::invalid_argument("invoice amount must not be negative"));
        }
        self.amount_due = new_amount;
        self.updated_at = now;
        Ok(())
    }

    /// Move a past-due `PENDING` invoice to `OVERDUE`.
    ///
    /// Returns whether a transition happened; repeated calls are no-ops.
    pub fn mark_overdue_if_applicable(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        let next = self.status.mark_overdue(self.is_overdue(today));
        if next == self.status {
            return false;
        }
        self.status = next;
        self.updated_at = now;
        true
    }

    /// Persistence adapters stamp the stored version on the copies they hand out.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Storage/transport shape of an invoice (plain fields, validated on load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub id: u64,
    pub customer_id: String,
    pub period: String,
    pub consumption_m3: i64,
    pub amount_due: Decimal,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: u64,
}
