//! Monthly dashboard
//!
//! Read-only roll-up of the evaluations stored for one month. Only subscriptions
//! with an evaluation for that month appear; missing usage is not treated as zero.

use crate::database::entities::EvaluationStatus;
use crate::database::{DatabaseManager, DatabaseResult};
use crate::evaluation::projected_annual_waste;
use crate::metrics;
use crate::period::UsagePeriod;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResult {
    pub year: i32,
    pub month: u32,
    /// Sum of monthly share costs, trials excluded
    pub total_monthly_cost: i64,
    pub total_annual_waste: i64,
    pub subscriptions: Vec<SubscriptionSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionSummary {
    pub subscription_id: i32,
    pub category_name: String,
    pub name: String,
    pub efficiency_rate: f64,
    pub status: EvaluationStatus,
    pub annual_waste: i64,
    pub is_trial: bool,
    /// Waste a trial would produce once converted to paid; zero otherwise
    pub potential_annual_waste: i64,
    pub cost_per_unit: i64,
}

pub struct DashboardService {
    database: Arc<dyn DatabaseManager>,
}

impl DashboardService {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }

    pub async fn get_monthly_dashboard(&self, period: UsagePeriod) -> DatabaseResult<DashboardResult> {
        let evaluations = self.database.evaluations().find_by_period(period).await?;

        let subscription_ids: Vec<i32> = evaluations.iter().map(|e| e.subscription_id).collect();
        let subscriptions: HashMap<i32, _> = self
            .database
            .subscriptions()
            .find_by_ids(&subscription_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut category_ids: Vec<i32> = subscriptions.values().map(|s| s.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();
        let categories: HashMap<i32, _> = self
            .database
            .categories()
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut total_monthly_cost = 0;
        let mut total_annual_waste = 0;
        let mut summaries = Vec::with_capacity(evaluations.len());

        for evaluation in evaluations {
            // Deleted between the two reads
            let Some(subscription) = subscriptions.get(&evaluation.subscription_id) else {
                warn!(
                    subscription_id = evaluation.subscription_id,
                    "Skipping evaluation of a missing subscription"
                );
                continue;
            };
            let category_name = categories
                .get(&subscription.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();

            let is_trial = subscription.status.is_trial();
            if !is_trial {
                total_monthly_cost += subscription.monthly_share_cost;
            }
            total_annual_waste += evaluation.annual_waste;

            let potential_annual_waste = if is_trial {
                projected_annual_waste(subscription.monthly_share_cost, evaluation.efficiency_rate)
            } else {
                0
            };

            summaries.push(SubscriptionSummary {
                subscription_id: subscription.id,
                category_name,
                name: subscription.name.clone(),
                efficiency_rate: evaluation.efficiency_rate,
                status: evaluation.status,
                annual_waste: evaluation.annual_waste,
                is_trial,
                potential_annual_waste,
                cost_per_unit: evaluation.cost_per_unit,
            });
        }

        info!(
            period = %period,
            subscriptions = summaries.len(),
            total_monthly_cost,
            total_annual_waste,
            "Built monthly dashboard"
        );
        metrics::track_dashboard_build(summaries.len());

        Ok(DashboardResult {
            year: period.year(),
            month: period.month(),
            total_monthly_cost,
            total_annual_waste,
            subscriptions: summaries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{CategoryType, SubscriptionStatus, subscriptions};
    use crate::test_utils::{TestServerBuilder, create_test_category, create_test_subscription};
    use sea_orm::{ConnectionTrait, EntityTrait};

    fn april() -> UsagePeriod {
        UsagePeriod::new(2025, 4).unwrap()
    }

    #[tokio::test]
    async fn test_trial_potential_waste_follows_rate() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.as_ref();
        let category = create_test_category(db, "OTT", CategoryType::Content, 1200).await;
        let heavy = create_test_subscription(
            db,
            category.id,
            "Heavy",
            10_000,
            SubscriptionStatus::Trial,
        )
        .await;
        let light = create_test_subscription(
            db,
            category.id,
            "Light",
            10_000,
            SubscriptionStatus::Trial,
        )
        .await;

        server
            .usage_service
            .record_usage_and_evaluate(heavy.id, 2025, 4, 1500)
            .await
            .unwrap();
        server
            .usage_service
            .record_usage_and_evaluate(light.id, 2025, 4, 600)
            .await
            .unwrap();

        let dashboard = server
            .dashboard_service
            .get_monthly_dashboard(april())
            .await
            .unwrap();
        assert_eq!(dashboard.total_monthly_cost, 0);
        assert_eq!(dashboard.total_annual_waste, 0);

        let heavy_row = &dashboard.subscriptions[0];
        assert_eq!(heavy_row.subscription_id, heavy.id);
        assert!(heavy_row.is_trial);
        assert_eq!(heavy_row.efficiency_rate, 125.0);
        assert_eq!(heavy_row.potential_annual_waste, 0);

        let light_row = &dashboard.subscriptions[1];
        assert_eq!(light_row.annual_waste, 0);
        assert_eq!(light_row.potential_annual_waste, 60_000);
    }

    #[tokio::test]
    async fn test_subscription_missing_between_reads_is_skipped() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.as_ref();
        let category = create_test_category(db, "CLOUD", CategoryType::Productivity, 25).await;
        let kept = create_test_subscription(
            db,
            category.id,
            "Kept",
            3_000,
            SubscriptionStatus::Active,
        )
        .await;
        let gone = create_test_subscription(
            db,
            category.id,
            "Gone",
            5_000,
            SubscriptionStatus::Active,
        )
        .await;

        for id in [kept.id, gone.id] {
            server
                .usage_service
                .record_usage_and_evaluate(id, 2025, 4, 5)
                .await
                .unwrap();
        }

        // Leave the evaluation behind, as a concurrent delete seen mid-read would
        let connection = db.connection();
        connection
            .execute_unprepared("PRAGMA foreign_keys = OFF")
            .await
            .unwrap();
        subscriptions::Entity::delete_by_id(gone.id)
            .exec(connection)
            .await
            .unwrap();

        let dashboard = server
            .dashboard_service
            .get_monthly_dashboard(april())
            .await
            .unwrap();
        assert_eq!(dashboard.subscriptions.len(), 1);
        assert_eq!(dashboard.subscriptions[0].subscription_id, kept.id);
        assert_eq!(dashboard.total_monthly_cost, 3_000);
        // 3000 * 0.8 * 12
        assert_eq!(dashboard.total_annual_waste, 28_800);
    }

    #[tokio::test]
    async fn test_empty_month() {
        let server = TestServerBuilder::new().build().await;
        let dashboard = server
            .dashboard_service
            .get_monthly_dashboard(april())
            .await
            .unwrap();

        assert_eq!(dashboard.year, 2025);
        assert_eq!(dashboard.month, 4);
        assert_eq!(dashboard.total_monthly_cost, 0);
        assert!(dashboard.subscriptions.is_empty());
    }
}
