use crate::{
    error::AppError,
    routes::{ApiErrorResponse, MessageResponse},
    server::Server,
};
use axum::{Router, extract::State, response::Json, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn create_usage_routes() -> Router<Server> {
    Router::new().route("/usages", post(record_usage))
}

/// One month of usage for one subscription
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsageReportRequest {
    pub subscription_id: i32,
    pub year: i32,
    pub month: i32,
    /// Minutes or days, depending on the subscription's category
    pub usage_value: i32,
}

/// Record usage and re-evaluate the month
#[utoipa::path(
    post,
    path = "/api/v1/usages",
    request_body = UsageReportRequest,
    responses(
        (status = 200, description = "Usage recorded and evaluated", body = MessageResponse),
        (status = 400, description = "Usage value or period invalid", body = ApiErrorResponse),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Usage"
)]
pub async fn record_usage(
    State(server): State<Server>,
    Json(request): Json<UsageReportRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    server
        .usage_service
        .record_usage_and_evaluate(
            request.subscription_id,
            request.year,
            request.month,
            request.usage_value,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Usage recorded and evaluated".to_string(),
    }))
}
