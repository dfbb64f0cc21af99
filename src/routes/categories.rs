use crate::{
    database::entities::Category, error::AppError, routes::ApiErrorResponse, server::Server,
};
use axum::{Router, extract::State, response::Json, routing::get};

pub fn create_category_routes() -> Router<Server> {
    Router::new().route("/categories", get(list_categories))
}

/// List reference categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<Category>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse),
    ),
    tag = "Categories"
)]
pub async fn list_categories(State(server): State<Server>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(server.database.categories().list().await?))
}
