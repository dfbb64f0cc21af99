use crate::server::Server;
use axum::{Router, response::Json, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscription Audit API",
        version = "1.0.0",
        description = "Tracks shared subscriptions, monthly usage and how efficiently each one is used"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::categories::list_categories,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::delete_subscription,
        crate::routes::usage::record_usage,
        crate::routes::dashboard::get_dashboard,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::routes::MessageResponse,
            crate::health::HealthResponse,
            crate::health::HealthStatus,
            crate::health::HealthCheckResult,
            crate::health::HealthSummary,
            crate::database::entities::categories::Model,
            crate::database::entities::UsageUnit,
            crate::database::entities::CategoryType,
            crate::database::entities::BillingCycle,
            crate::database::entities::SubscriptionStatus,
            crate::database::entities::EvaluationStatus,
            crate::routes::subscriptions::CreateSubscriptionRequest,
            crate::routes::subscriptions::SubscriptionResponse,
            crate::routes::usage::UsageReportRequest,
            crate::dashboard::DashboardResult,
            crate::dashboard::SubscriptionSummary,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Categories", description = "Reference categories"),
        (name = "Subscriptions", description = "Subscription registration"),
        (name = "Usage", description = "Monthly usage reports and evaluation"),
        (name = "Dashboard", description = "Monthly spend and waste overview"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
