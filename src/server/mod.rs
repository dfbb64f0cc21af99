pub mod config;
pub mod middleware;

use crate::{
    config::Config,
    dashboard::DashboardService,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    evaluation::StatusPolicy,
    health::HealthService,
    metrics,
    routes::{create_api_routes, create_docs_routes, create_health_routes},
    shutdown::{DatabaseShutdown, ShutdownCoordinator, ShutdownManager},
    usage_tracking::UsageService,
};
use axum::{Router, middleware::from_fn};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub health_service: Arc<HealthService>,
    pub usage_service: Arc<UsageService>,
    pub dashboard_service: Arc<DashboardService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let policy = StatusPolicy::with_thresholds(&config.evaluation);
        Self::new_with_policy(config, policy).await
    }

    /// Build the server with a custom status policy in place of the configured thresholds
    pub async fn new_with_policy(config: Config, policy: StatusPolicy) -> Result<Self, AppError> {
        config.validate()?;

        if config.metrics.enabled {
            match metrics::init_metrics_with_port(config.metrics.port) {
                Ok(_handle) => {
                    info!("Metrics server started on port {}", config.metrics.port);
                }
                Err(e) => {
                    error!(
                        "Failed to start metrics server on port {}: {}",
                        config.metrics.port, e
                    );
                    return Err(AppError::Internal(format!(
                        "Failed to start metrics server: {}",
                        e
                    )));
                }
            }
        }

        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config.database)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        let usage_service = Arc::new(UsageService::new(database.clone(), policy));
        let dashboard_service = Arc::new(DashboardService::new(database.clone()));

        Ok(Self {
            config: Arc::new(config),
            database,
            health_service,
            usage_service,
            dashboard_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            info!("Running database migrations");
            self.database.migrate().await.map_err(AppError::Database)?;
            info!("Database migrations completed successfully");
        }

        let mut shutdown_manager = ShutdownManager::new(Duration::from_secs(30));
        shutdown_manager.register(DatabaseShutdown::new(self.database.clone()));

        let app = self.create_app();

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("Graceful shutdown initiated");
            })
            .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        Ok(())
    }

    // Creates an application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .nest("/health", create_health_routes())
            .nest("/api/v1", create_api_routes())
            .nest("/docs", create_docs_routes())
            .with_state(self.clone());

        if self.config.metrics.enabled {
            app = app.layer(from_fn(metrics::metrics_middleware));
        }
        if self.config.logging.log_request {
            app = app.layer(from_fn(middleware::request_response_logger));
        }
        app
    }
}
