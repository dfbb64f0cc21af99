//! Usage recorder
//!
//! A usage report is validated, written to `usage_records`, evaluated and written
//! to `subscription_evaluations` inside one transaction. Both writes go through
//! the same optimistic upsert, so concurrent first reports for a month never
//! create duplicate rows.

use crate::database::dao::{
    CategoriesDao, EvaluationsDao, MonthlyKey, SubscriptionsDao, UsageDao, upsert_monthly,
};
use crate::database::{DatabaseError, DatabaseManager};
use crate::evaluation::{EvaluationInput, StatusPolicy, evaluate};
use crate::metrics;
use crate::period::{PeriodError, UsagePeriod};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Subscription {0} not found")]
    SubscriptionNotFound(i32),
    #[error("Category {0} not found")]
    CategoryNotFound(i32),
    #[error("Invalid usage value {usage_value}: {reason}")]
    InvalidUsageValue { usage_value: i32, reason: String },
    #[error("Invalid usage period: {0}")]
    InvalidPeriod(#[from] PeriodError),
    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl UsageError {
    fn metric_label(&self) -> &'static str {
        match self {
            UsageError::SubscriptionNotFound(_) | UsageError::CategoryNotFound(_) => "not_found",
            UsageError::InvalidUsageValue { .. } | UsageError::InvalidPeriod(_) => "invalid",
            UsageError::Storage(_) => "error",
        }
    }
}

/// Records usage samples and keeps the matching evaluations in sync
pub struct UsageService {
    database: Arc<dyn DatabaseManager>,
    policy: StatusPolicy,
}

impl UsageService {
    pub fn new(database: Arc<dyn DatabaseManager>, policy: StatusPolicy) -> Self {
        Self { database, policy }
    }

    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }

    /// Record one month of usage for a subscription and re-evaluate that month.
    ///
    /// Validation runs before any write: the subscription must exist, the value
    /// must be non-negative and must fit into the month (days, or minutes for
    /// time based categories). A failed validation leaves no partial state.
    pub async fn record_usage_and_evaluate(
        &self,
        subscription_id: i32,
        year: i32,
        month: i32,
        usage_value: i32,
    ) -> Result<(), UsageError> {
        let result = self
            .record_in_transaction(subscription_id, year, month, usage_value)
            .await;

        match &result {
            Ok(()) => metrics::track_usage_report("recorded"),
            Err(err) => {
                if let UsageError::Storage(db_err) = err {
                    error!(
                        subscription_id,
                        year, month, "Failed to record usage: {}", db_err
                    );
                }
                metrics::track_usage_report(err.metric_label());
            }
        }

        result
    }

    async fn record_in_transaction(
        &self,
        subscription_id: i32,
        year: i32,
        month: i32,
        usage_value: i32,
    ) -> Result<(), UsageError> {
        // Dropped without commit on any early return, which rolls back
        let txn = self.database.begin().await?;

        let subscription = SubscriptionsDao::new(&txn)
            .find_by_id(subscription_id)
            .await?
            .ok_or(UsageError::SubscriptionNotFound(subscription_id))?;

        if usage_value < 0 {
            return Err(UsageError::InvalidUsageValue {
                usage_value,
                reason: "usage must not be negative".to_string(),
            });
        }

        let period = UsagePeriod::new(year, month)?;

        let category = CategoriesDao::new(&txn)
            .find_by_id(subscription.category_id)
            .await?
            .ok_or(UsageError::CategoryNotFound(subscription.category_id))?;

        let cap = category.unit.monthly_cap(period.days_in_month());
        if i64::from(usage_value) > cap {
            return Err(UsageError::InvalidUsageValue {
                usage_value,
                reason: format!(
                    "exceeds the {} limit of {} for {}",
                    category.unit.as_str(),
                    cap,
                    period
                ),
            });
        }

        let key = MonthlyKey::new(subscription_id, period);
        upsert_monthly(&UsageDao::new(&txn), &key, &usage_value).await?;

        let input = EvaluationInput::from_snapshot(usage_value, &subscription, &category);
        let outcome = evaluate(&input, &self.policy);
        upsert_monthly(&EvaluationsDao::new(&txn), &key, &outcome).await?;

        txn.commit().await.map_err(DatabaseError::from)?;

        info!(
            subscription_id,
            period = %period,
            usage_value,
            efficiency_rate = outcome.efficiency_rate,
            status = ?outcome.status,
            "Recorded usage"
        );

        Ok(())
    }
}
