pub mod categories;
pub mod dashboard;
pub mod docs;
pub mod health;
pub mod subscriptions;
pub mod usage;

pub use docs::create_docs_routes;
pub use health::create_health_routes;

use crate::server::Server;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Short error label
    pub error: String,
    /// Human readable detail
    pub message: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Versioned business API, mounted under `/api/v1`
pub fn create_api_routes() -> Router<Server> {
    Router::new()
        .merge(categories::create_category_routes())
        .merge(subscriptions::create_subscription_routes())
        .merge(usage::create_usage_routes())
        .merge(dashboard::create_dashboard_routes())
}
