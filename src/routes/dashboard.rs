use crate::{
    dashboard::DashboardResult, error::AppError, period::UsagePeriod, routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub fn create_dashboard_routes() -> Router<Server> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DashboardQuery {
    pub year: i32,
    pub month: i32,
}

/// Monthly roll-up of all evaluated subscriptions
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard for the month", body = DashboardResult),
        (status = 400, description = "Invalid year or month", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(server): State<Server>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResult>, AppError> {
    let period = UsagePeriod::for_dashboard(query.year, query.month)?;
    let dashboard = server.dashboard_service.get_monthly_dashboard(period).await?;
    Ok(Json(dashboard))
}
