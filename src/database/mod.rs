//! Database access layer with domain-specific DAOs
//!
//! Each table has its own DAO. DAOs borrow any sea-orm connection, so the same
//! code runs against the pool or inside a unit-of-work transaction.

use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr, TransactionTrait,
};
use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use config::DatabaseConfig;
pub use dao::{
    CategoriesDao, EvaluationsDao, MonthlyKey, MonthlyRecordStore, SubscriptionsDao, UsageDao,
    upsert_monthly,
};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Record not found")]
    NotFound,
    #[error("Unique constraint conflict: {0}")]
    Conflict(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<DbErr> for DatabaseError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => DatabaseError::Conflict(detail),
            _ => DatabaseError::Database(err.to_string()),
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Start a unit of work; dropped without commit it rolls back
    async fn begin(&self) -> DatabaseResult<DatabaseTransaction>;

    /// Get categories DAO
    fn categories(&self) -> CategoriesDao<'_, DatabaseConnection>;

    /// Get subscriptions DAO
    fn subscriptions(&self) -> SubscriptionsDao<'_, DatabaseConnection>;

    /// Get usage DAO
    fn usage(&self) -> UsageDao<'_, DatabaseConnection>;

    /// Get evaluations DAO
    fn evaluations(&self) -> EvaluationsDao<'_, DatabaseConnection>;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(pool_size(config))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .sqlx_logging(false);

        // Every in-memory SQLite connection is its own database
        if config.url.starts_with("sqlite::memory:") {
            options.min_connections(1);
        }

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

/// Maximum pool size for the configured backend.
///
/// SQLite allows a single writer, and a deferred transaction that has already read
/// fails with SQLITE_BUSY when it tries to write while another one holds the lock.
/// SQLite pools therefore hold one connection so units of work queue on acquire.
fn pool_size(config: &DatabaseConfig) -> u32 {
    if config.url.starts_with("sqlite:") {
        1
    } else {
        config.max_connections
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    async fn begin(&self) -> DatabaseResult<DatabaseTransaction> {
        Ok(self.connection.begin().await?)
    }

    fn categories(&self) -> CategoriesDao<'_, DatabaseConnection> {
        CategoriesDao::new(&self.connection)
    }

    fn subscriptions(&self) -> SubscriptionsDao<'_, DatabaseConnection> {
        SubscriptionsDao::new(&self.connection)
    }

    fn usage(&self) -> UsageDao<'_, DatabaseConnection> {
        UsageDao::new(&self.connection)
    }

    fn evaluations(&self) -> EvaluationsDao<'_, DatabaseConnection> {
        EvaluationsDao::new(&self.connection)
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => crate::health::HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_error_is_fatal() {
        let err: DatabaseError = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, DatabaseError::Database(_)));
    }

    #[test]
    fn test_sqlite_pools_hold_one_connection() {
        let config = |url: &str| DatabaseConfig {
            url: url.to_string(),
            max_connections: 8,
            ..Default::default()
        };
        assert_eq!(pool_size(&config("sqlite::memory:")), 1);
        assert_eq!(pool_size(&config("sqlite://./data/audit.db?mode=rwc")), 1);
        assert_eq!(pool_size(&config("postgres://localhost/audit")), 8);
    }

    #[tokio::test]
    async fn test_in_memory_manager_health() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let manager = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
        manager.migrate().await.unwrap();
        assert!(manager.health_check().await.is_ok());
    }
}
