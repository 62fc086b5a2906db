use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::routes::common::parse_customer_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/:customer_id", get(get_consolidated_debt))
}

pub async fn get_consolidated_debt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(customer_id): Path<String>,
) -> axum::response::Response {
    let customer_id = match parse_customer_id(&customer_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.debts.get_consolidated_debt(&customer_id) {
        Ok(debt) => (StatusCode::OK, Json(dto::debt_to_dto(&debt))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
