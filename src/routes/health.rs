use crate::{health::HealthResponse, server::Server};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct HealthCheckQuery {
    /// Run only the named check
    #[serde(default)]
    pub check: Option<String>,
}

pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/", get(health_check))
}

/// Aggregated health of the service and its dependencies
#[utoipa::path(
    get,
    path = "/health",
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Health report", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(server): State<Server>,
    Query(params): Query<HealthCheckQuery>,
) -> Json<HealthResponse> {
    Json(
        server
            .health_service
            .check_health(params.check.as_deref())
            .await,
    )
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_database() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"]["database"]["status"], "healthy");
        assert_eq!(json["summary"]["total_checks"], 1);
    }

    #[tokio::test]
    async fn test_health_filter_unknown_check() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health?check=redis")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["summary"]["total_checks"], 0);
    }
}
