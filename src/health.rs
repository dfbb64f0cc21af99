use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            details: None,
            duration_ms: None,
        }
    }

    pub fn healthy_with_details(details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::healthy()
        }
    }

    pub fn degraded(message: String) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message),
            details: None,
            duration_ms: None,
        }
    }

    pub fn unhealthy_with_details(message: String, details: serde_json::Value) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message),
            details: Some(details),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// A component that can report its own health
#[async_trait]
pub trait HealthChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: BTreeMap<String, HealthCheckResult>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthSummary {
    pub total_checks: usize,
    pub healthy_count: usize,
    pub degraded_count: usize,
    pub unhealthy_count: usize,
    pub total_duration_ms: u64,
}

#[derive(Default)]
pub struct HealthService {
    checkers: RwLock<Vec<Arc<dyn HealthChecker>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a health checker; a checker with the same name is replaced
    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let mut checkers = self.checkers.write().await;
        checkers.retain(|existing| existing.name() != checker.name());
        checkers.push(checker);
    }

    /// Run every registered check, or only the one named by `filter`
    pub async fn check_health(&self, filter: Option<&str>) -> HealthResponse {
        let checkers = self.checkers.read().await;
        let mut results = BTreeMap::new();
        let mut total_duration = 0u64;

        for checker in checkers
            .iter()
            .filter(|c| filter.is_none_or(|name| c.name() == name))
        {
            let start = Instant::now();
            let result = checker.check().await;
            let duration = start.elapsed().as_millis() as u64;
            total_duration += duration;
            results.insert(checker.name().to_string(), result.with_duration(duration));
        }

        let count = |status: HealthStatus| results.values().filter(|r| r.status == status).count();
        let healthy_count = count(HealthStatus::Healthy);
        let degraded_count = count(HealthStatus::Degraded);
        let unhealthy_count = count(HealthStatus::Unhealthy);

        // Worst status wins
        let status = if unhealthy_count > 0 {
            HealthStatus::Unhealthy
        } else if degraded_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthResponse {
            status,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: HealthSummary {
                total_checks: results.len(),
                healthy_count,
                degraded_count,
                unhealthy_count,
                total_duration_ms: total_duration,
            },
            checks: results,
        }
    }
}
