//! Invoice status lifecycle.
//!
//! ```text
//! PENDING ──pay──▶ PAID
//!    │  └──past due──▶ OVERDUE ──pay──▶ PAID
//!    └──void──▶ VOID ◀──void── OVERDUE
//! ```
//!
//! Nothing ever returns to `PENDING`, `PAID` cannot be voided and `VOID`
//! cannot be paid.

use serde::{Deserialize, Serialize};

use debtview_core::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Void,
}

impl InvoiceStatus {
    pub const INITIAL: InvoiceStatus = InvoiceStatus::Pending;

    /// Transition for a registered payment.
    pub fn register_payment(self) -> DomainResult<Self> {
        match self {
            InvoiceStatus::Pending | InvoiceStatus::Overdue => Ok(InvoiceStatus::Paid),
            InvoiceStatus::Void => Err(DomainError::invalid_state("cannot pay a voided invoice")),
            InvoiceStatus::Paid => Err(DomainError::invalid_state("invoice is already paid")),
        }
    }

    /// Transition for voiding.
    pub fn void(self) -> DomainResult<Self> {
        match self {
            InvoiceStatus::Paid => Err(DomainError::invalid_state("cannot void a paid invoice")),
            InvoiceStatus::Pending | InvoiceStatus::Overdue | InvoiceStatus::Void => {
                Ok(InvoiceStatus::Void)
            }
        }
    }

    /// Transition applied by the overdue sweep. Only `PENDING` moves, and only
    /// when the due date has passed; every other combination is a no-op.
    pub fn mark_overdue(self, past_due: bool) -> Self {
        match self {
            InvoiceStatus::Pending if past_due => InvoiceStatus::Overdue,
            other => other,
        }
    }

    pub fn permits_amount_change(self) -> bool {
        self != InvoiceStatus::Paid
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Void => "VOID",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
