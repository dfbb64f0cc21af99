use crate::database::DatabaseError;
use crate::period::PeriodError;
use crate::usage_tracking::UsageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    /// Reference data that can never be evaluated consistently
    ReferenceData(String),
    Database(DatabaseError),
    NotFound(String),
    Validation(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
            AppError::ReferenceData(msg) => write!(f, "Invalid reference data: {}", msg),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<UsageError> for AppError {
    fn from(err: UsageError) -> Self {
        match err {
            UsageError::SubscriptionNotFound(_) | UsageError::CategoryNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            UsageError::InvalidUsageValue { .. } | UsageError::InvalidPeriod(_) => {
                AppError::Validation(err.to_string())
            }
            UsageError::Storage(db_err) => AppError::Database(db_err),
        }
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::ReferenceData(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid reference data")
            }
            AppError::Database(DatabaseError::NotFound) | AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Not found")
            }
            AppError::Database(DatabaseError::Conflict(_)) => (StatusCode::CONFLICT, "Conflict"),
            AppError::Database(err) => {
                tracing::error!("Storage failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_app_error_display() {
        let config_err = AppError::Config(config::ConfigError::NotFound("test".to_string()));
        assert!(config_err.to_string().contains("Configuration error"));

        let internal_err = AppError::Internal("test message".to_string());
        assert_eq!(internal_err.to_string(), "Internal error: test message");

        let validation_err = AppError::Validation("usage too large".to_string());
        assert_eq!(validation_err.to_string(), "Validation failed: usage too large");
    }

    #[test]
    fn test_app_error_from_usage_error() {
        let app_err: AppError = UsageError::SubscriptionNotFound(9).into();
        assert!(matches!(app_err, AppError::NotFound(_)));

        let app_err: AppError = UsageError::InvalidUsageValue {
            usage_value: -1,
            reason: "must not be negative".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Validation(_)));

        let app_err: AppError =
            UsageError::Storage(DatabaseError::Database("io".to_string())).into();
        assert!(matches!(app_err, AppError::Database(DatabaseError::Database(_))));
    }

    #[test]
    fn test_app_error_into_response() {
        let cases = [
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Database(DatabaseError::NotFound), StatusCode::NOT_FOUND),
            (AppError::Validation("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
            (
                AppError::Database(DatabaseError::Conflict("dup".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Database(DatabaseError::Database("io".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::ReferenceData("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_response_body_format() {
        let response = AppError::NotFound("Subscription 3 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Not found");
        assert_eq!(json["message"], "Not found: Subscription 3 not found");
    }
}
