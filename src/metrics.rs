use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;
use tracing::info;

/// Initialize Prometheus metrics exporter listening on the given port
pub fn init_metrics_with_port(
    port: u16,
) -> Result<PrometheusHandle, Box<dyn std::error::Error + Send + Sync>> {
    let builder = PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .add_global_label("service", "subscription_audit");

    let handle = builder.install_recorder()?;

    info!("Metrics server started on :{}/metrics", port);
    Ok(handle)
}

/// Middleware to collect HTTP request metrics
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method),
        ("path", path),
        ("status", status),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    gauge!("http_requests_active").decrement(1.0);

    if response.status().is_server_error() {
        counter!("http_errors_total", &labels[..2]).increment(1);
    }

    response
}

/// Track the outcome of a usage report: "recorded", "not_found", "invalid" or "error"
pub fn track_usage_report(result: &'static str) {
    counter!("usage_reports_total", "result" => result).increment(1);
}

/// Track an insert race that the upsert protocol absorbed
pub fn track_upsert_conflict(table: &'static str) {
    counter!("upsert_conflicts_recovered_total", "table" => table).increment(1);
}

/// Track a dashboard build and how many subscriptions it covered
pub fn track_dashboard_build(subscriptions: usize) {
    counter!("dashboard_builds_total").increment(1);
    histogram!("dashboard_subscriptions").record(subscriptions as f64);
}
