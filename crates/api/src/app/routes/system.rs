use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// One log line per request with status and latency.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    res
}
