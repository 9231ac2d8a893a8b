//! Request logging middleware.

use crate::extractors::X_REQUEST_ID;
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Request logging middleware.
///
/// Makes sure every request carries an `x-request-id`, echoes it on the
/// response and logs the outcome under it.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let existing = request
        .headers()
        .get(&X_REQUEST_ID)
        .filter(|value| value.to_str().is_ok_and(|v| !v.trim().is_empty()))
        .cloned();

    let request_id = match existing {
        Some(value) => value,
        None => {
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request.headers_mut().insert(X_REQUEST_ID, generated.clone());
            generated
        }
    };

    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        target: "http",
        request_id = %request_id.to_str().unwrap_or_default(),
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request completed"
    );

    response.headers_mut().insert(X_REQUEST_ID, request_id);
    response
}
