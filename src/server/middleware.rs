use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Structured request/response logging for API and health routes
pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    // Docs are static; not worth a log line per fetch
    if !(path.starts_with("/api") || path.starts_with("/health")) {
        return next.run(req).await;
    }

    info!(method = %method, path = %path, "API request");

    let start = Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        latency_ms = %duration.as_millis(),
        "API response"
    );

    response
}
