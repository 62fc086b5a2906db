use axum::http::StatusCode;
use axum::response::Response;

use debtview_core::{BillingPeriod, CustomerId, InvoiceId};

use crate::app::errors;

pub fn parse_invoice_id(raw: &str) -> Result<InvoiceId, Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id"))
}

pub fn parse_customer_id(raw: &str) -> Result<CustomerId, Response> {
    CustomerId::new(raw).map_err(errors::domain_error_to_response)
}

pub fn parse_period(raw: &str) -> Result<BillingPeriod, Response> {
    BillingPeriod::new(raw).map_err(errors::domain_error_to_response)
}
