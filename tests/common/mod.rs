#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use subscription_audit::{
    Server,
    commands::init::seed_default_categories,
    database::DatabaseManager,
    test_utils::TestServerBuilder,
};
use tower::ServiceExt;

/// Server plus router, with helpers that speak JSON
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    /// In-memory server with the default categories installed
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        seed_default_categories(server.database.as_ref())
            .await
            .unwrap();
        let app = server.create_app();
        Self { server, app }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// ID of a seeded category by name
    pub async fn category_id(&self, name: &str) -> i32 {
        self.server
            .database
            .categories()
            .find_by_name(name)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    /// Register a subscription through the API and return its ID
    pub async fn create_subscription(
        &self,
        category: &str,
        name: &str,
        user_share_cost: i64,
        billing_cycle: &str,
        status: &str,
    ) -> i32 {
        let category_id = self.category_id(category).await;
        let (code, body) = self
            .post(
                "/api/v1/subscriptions",
                serde_json::json!({
                    "category_id": category_id,
                    "name": name,
                    "total_cost": user_share_cost * 2,
                    "user_share_cost": user_share_cost,
                    "billing_cycle": billing_cycle,
                    "status": status,
                }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "unexpected body: {}", body);
        body["id"].as_i64().unwrap() as i32
    }

    pub async fn report_usage(
        &self,
        subscription_id: i32,
        year: i32,
        month: i32,
        usage_value: i32,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/v1/usages",
            serde_json::json!({
                "subscription_id": subscription_id,
                "year": year,
                "month": month,
                "usage_value": usage_value,
            }),
        )
        .await
    }
}
