use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::routes::common::{parse_customer_id, parse_period};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/customer/:customer_id", get(list_by_customer))
        .route("/customer/:customer_id/period/:period", get(list_by_period))
        .route("/customer/:customer_id/elevated", get(list_elevated))
}

pub async fn list_by_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_customer_id(&customer_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.energy.list_by_customer(&customer_id) {
        Ok(records) => (StatusCode::OK, Json(dto::energy_records_to_dto(&records))).into_response(),
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
    match services.energy.list_by_customer_and_period(&customer_id, &period) {
        Ok(records) => (StatusCode::OK, Json(dto::energy_records_to_dto(&records))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_elevated(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_customer_id(&customer_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.energy.list_elevated(&customer_id) {
        Ok(records) => (StatusCode::OK, Json(dto::energy_records_to_dto(&records))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
