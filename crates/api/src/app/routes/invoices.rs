use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use debtview_billing::Clock;
use debtview_core::Money;
use debtview_invoicing::Invoice;

use crate::app::routes::common::{parse_customer_id, parse_invoice_id, parse_period};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/overdue/mark", post(mark_overdue_invoices))
        .route("/customer/:customer_id", get(list_by_customer))
        .route("/customer/:customer_id/period/:period", get(list_by_period))
        .route("/:id", get(get_invoice))
        .route("/:id/payments", post(register_invoice_payment))
        .route("/:id/void", post(void_invoice))
        .route("/:id/amount", put(update_invoice_amount))
}

fn invoice_response(services: &AppServices, invoice: &Invoice) -> axum::response::Response {
    let today = services.clock().today();
    (StatusCode::OK, Json(dto::invoice_to_dto(invoice, today))).into_response()
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let invoice_id = match parse_invoice_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.invoices.get_invoice(invoice_id) {
        Ok(invoice) => invoice_response(&services, &invoice),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_by_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_customer_id(&customer_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.invoices.list_by_customer(&customer_id) {
        Ok(invoices) => {
            let today = services.clock().today();
            (StatusCode::OK, Json(dto::invoices_to_dto(&invoices, today))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_by_period(
    Extension(services): Extension<Arc<AppServices>>,
    Path((customer_id, period)): Path<(String, String)>,
) -> axum::response::Response {
    let customer_id = match parse_customer_id(&customer_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let period = match parse_period(&period) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.invoices.list_by_customer_and_period(&customer_id, &period) {
        Ok(invoices) => {
            let today = services.clock().today();
            (StatusCode::OK, Json(dto::invoices_to_dto(&invoices, today))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn register_invoice_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let invoice_id = match parse_invoice_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.invoices.register_payment(invoice_id) {
        Ok(invoice) => invoice_response(&services, &invoice),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn void_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let invoice_id = match parse_invoice_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.invoices.void_invoice(invoice_id) {
        Ok(invoice) => invoice_response(&services, &invoice),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_invoice_amount(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAmountRequest>,
) -> axum::response::Response {
    let invoice_id = match parse_invoice_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let amount = match Money::parse(&body.amount) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.invoices.update_amount(invoice_id, amount) {
        Ok(invoice) => invoice_response(&services, &invoice),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Runs the sweep on the blocking pool; it walks the whole pending set.
pub async fn mark_overdue_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let result =
        tokio::task::spawn_blocking(move || services.invoices.mark_overdue_invoices()).await;
    match result {
        Ok(Ok(report)) => (StatusCode::OK, Json(dto::overdue_report_to_dto(report))).into_response(),
        Ok(Err(e)) => errors::service_error_to_response(e),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "sweep_failed",
            e.to_string(),
        ),
    }
}
