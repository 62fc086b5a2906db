//! Customer-facing debt alerts.

use serde::{Deserialize, Serialize};

/// Invoices whose due date is at most this many days away count as "due soon".
pub const DUE_SOON_WINDOW_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebtAlert {
    /// Invoices past their due date (by date or by status).
    OverdueInvoices { count: usize },
    /// Pending invoices due within [`DUE_SOON_WINDOW_DAYS`].
    InvoicesDueSoon { count: usize },
}

// Messages are shown verbatim to customers, hence Spanish.
impl core::fmt::Display for DebtAlert {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DebtAlert::OverdueInvoices { count } => {
                write!(f, "Tiene {count} factura(s) vencida(s)")
            }
            DebtAlert::InvoicesDueSoon { count } => {
                write!(f, "Tiene {count} factura(s) proxima(s) a vencer")
            }
        }
    }
}
