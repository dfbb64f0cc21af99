use crate::{
    database::entities::{BillingCycle, Category, Subscription, SubscriptionStatus, subscriptions},
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

pub fn create_subscription_routes() -> Router<Server> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/{id}", delete(delete_subscription))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub category_id: i32,
    pub name: String,
    pub total_cost: i64,
    /// Part of the total this user pays
    pub user_share_cost: i64,
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub status: SubscriptionStatus,
}

impl CreateSubscriptionRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Subscription name cannot be empty".to_string(),
            ));
        }
        if self.total_cost < 0 || self.user_share_cost < 0 {
            return Err(AppError::BadRequest(
                "Costs must not be negative".to_string(),
            ));
        }
        if self.user_share_cost > self.total_cost {
            return Err(AppError::BadRequest(format!(
                "user_share_cost ({}) cannot exceed total_cost ({})",
                self.user_share_cost, self.total_cost
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub category_id: i32,
    pub category_name: String,
    pub name: String,
    pub total_cost: i64,
    pub user_share_cost: i64,
    pub monthly_share_cost: i64,
    pub billing_cycle: BillingCycle,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionResponse {
    fn new(subscription: Subscription, category_name: String) -> Self {
        Self {
            id: subscription.id,
            category_id: subscription.category_id,
            category_name,
            name: subscription.name,
            total_cost: subscription.total_cost,
            user_share_cost: subscription.user_share_cost,
            monthly_share_cost: subscription.monthly_share_cost,
            billing_cycle: subscription.billing_cycle,
            status: subscription.status,
            created_at: subscription.created_at,
        }
    }
}

/// Register a subscription
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 404, description = "Category not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Subscriptions"
)]
pub async fn create_subscription(
    State(server): State<Server>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    request.validate()?;

    let category = server
        .database
        .categories()
        .find_by_id(request.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", request.category_id)))?;

    let subscription = subscriptions::Model::new(
        category.id,
        request.name.trim(),
        request.total_cost,
        request.user_share_cost,
        request.billing_cycle,
        request.status,
    );
    let created = server.database.subscriptions().create(&subscription).await?;

    tracing::info!(
        subscription_id = created.id,
        category = %category.name,
        monthly_share_cost = created.monthly_share_cost,
        "Registered subscription"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(created, category.name)),
    ))
}

/// List all subscriptions with their category names
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = Vec<SubscriptionResponse>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(server): State<Server>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let categories: HashMap<i32, Category> = server
        .database
        .categories()
        .list()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let subscriptions = server.database.subscriptions().list().await?;

    let response = subscriptions
        .into_iter()
        .map(|s| {
            let category_name = categories
                .get(&s.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            SubscriptionResponse::new(s, category_name)
        })
        .collect();

    Ok(Json(response))
}

/// Delete a subscription together with its usage and evaluation history
#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    params(
        ("id" = i32, Path, description = "Subscription ID")
    ),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 404, description = "Subscription not found", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Subscriptions"
)]
pub async fn delete_subscription(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !server.database.subscriptions().delete(id).await? {
        return Err(AppError::NotFound(format!("Subscription {} not found", id)));
    }

    tracing::info!(subscription_id = id, "Deleted subscription");
    Ok(StatusCode::NO_CONTENT)
}
