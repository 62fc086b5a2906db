use axum::Router;

pub mod common;
pub mod debts;
pub mod energy;
pub mod invoices;
pub mod system;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .nest("/debts", debts::router())
        .nest("/invoices", invoices::router())
        .nest("/energy", energy::router())
}
