use crate::database::DatabaseManager;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{signal, sync::watch, time::timeout};
use tracing::{error, info};

/// Graceful shutdown coordinator
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_requested: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Get a receiver for shutdown notifications
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Initiate graceful shutdown; later calls are no-ops
    pub fn initiate_shutdown(&self) {
        if self
            .shutdown_requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            info!("Initiating graceful shutdown...");
            if let Err(e) = self.shutdown_tx.send(true) {
                error!("Failed to broadcast shutdown signal: {}", e);
            }
        }
    }

    /// Wait for Ctrl+C or SIGTERM, then initiate shutdown
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C signal");
            },
            _ = terminate => {
                info!("Received terminate signal");
            },
        }

        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for components that need graceful shutdown
#[async_trait::async_trait]
pub trait GracefulShutdown {
    fn name(&self) -> &str;

    async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Shuts registered components down in registration order
pub struct ShutdownManager {
    components: Vec<Box<dyn GracefulShutdown + Send + Sync>>,
    timeout_duration: Duration,
}

impl ShutdownManager {
    pub fn new(timeout_duration: Duration) -> Self {
        Self {
            components: Vec::new(),
            timeout_duration,
        }
    }

    pub fn register<T>(&mut self, component: T)
    where
        T: GracefulShutdown + Send + Sync + 'static,
    {
        self.components.push(Box::new(component));
    }

    pub async fn shutdown_all(&self) {
        info!("Shutting down {} components...", self.components.len());

        for component in &self.components {
            let component_name = component.name();

            match timeout(self.timeout_duration, component.shutdown()).await {
                Ok(Ok(())) => {
                    info!("Successfully shut down component: {}", component_name);
                }
                Ok(Err(e)) => {
                    error!("Error shutting down component {}: {}", component_name, e);
                }
                Err(_) => {
                    error!("Timeout shutting down component: {}", component_name);
                }
            }
        }

        info!("Shutdown complete");
    }
}

/// Closes the connection pool once the HTTP server has drained
pub struct DatabaseShutdown {
    database: Arc<dyn DatabaseManager>,
}

impl DatabaseShutdown {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }
}

#[async_trait::async_trait]
impl GracefulShutdown for DatabaseShutdown {
    fn name(&self) -> &str {
        "Database"
    }

    async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Closing database connections...");
        // Clones share the pool, so closing one closes all
        self.database.connection().clone().close().await?;
        Ok(())
    }
}
