// src/logging_middleware.rs
//! Request logging middleware
//!
//! Records method, URI, status and latency. Bodies are never read here: they
//! carry passwords, tokens and clip text.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    debug!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        latency_ms = started.elapsed().as_millis() as u64,
        "📤 Response"
    );

    response
}
