use super::{MonthlyKey, MonthlyRecordStore, insert_in_savepoint};
use crate::database::DatabaseResult;
use crate::database::entities::{EvaluationRecord, subscription_evaluations};
use crate::evaluation::EvaluationOutcome;
use crate::period::UsagePeriod;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Subscription evaluations DAO for database operations
pub struct EvaluationsDao<'c, C> {
    db: &'c C,
}

impl<'c, C> EvaluationsDao<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// All evaluations of one month, ordered by subscription
    pub async fn find_by_period(&self, period: UsagePeriod) -> DatabaseResult<Vec<EvaluationRecord>> {
        Ok(subscription_evaluations::Entity::find()
            .filter(subscription_evaluations::Column::EvalYear.eq(period.year()))
            .filter(subscription_evaluations::Column::EvalMonth.eq(period.month_i32()))
            .order_by_asc(subscription_evaluations::Column::SubscriptionId)
            .all(self.db)
            .await?)
    }
}

#[async_trait]
impl<'c, C> MonthlyRecordStore for EvaluationsDao<'c, C>
where
    C: ConnectionTrait + TransactionTrait + Sync,
{
    type Record = EvaluationRecord;
    type Values = EvaluationOutcome;

    const TABLE: &'static str = "subscription_evaluations";

    async fn find_by_key(&self, key: &MonthlyKey) -> DatabaseResult<Option<EvaluationRecord>> {
        Ok(subscription_evaluations::Entity::find()
            .filter(subscription_evaluations::Column::SubscriptionId.eq(key.subscription_id))
            .filter(subscription_evaluations::Column::EvalYear.eq(key.period.year()))
            .filter(subscription_evaluations::Column::EvalMonth.eq(key.period.month_i32()))
            .one(self.db)
            .await?)
    }

    async fn insert_flush(
        &self,
        key: &MonthlyKey,
        outcome: &EvaluationOutcome,
    ) -> DatabaseResult<EvaluationRecord> {
        let active_model = subscription_evaluations::ActiveModel {
            id: ActiveValue::NotSet,
            subscription_id: Set(key.subscription_id),
            eval_year: Set(key.period.year()),
            eval_month: Set(key.period.month_i32()),
            efficiency_rate: Set(outcome.efficiency_rate),
            status: Set(outcome.status),
            cost_per_unit: Set(outcome.cost_per_unit),
            annual_waste: Set(outcome.annual_waste),
            reference_snapshot_value: Set(outcome.reference_snapshot_value),
            evaluated_at: Set(Utc::now()),
        };

        insert_in_savepoint(self.db, active_model).await
    }

    async fn apply(
        &self,
        existing: EvaluationRecord,
        outcome: &EvaluationOutcome,
    ) -> DatabaseResult<EvaluationRecord> {
        let mut active_model = subscription_evaluations::ActiveModel::from(existing);
        active_model.efficiency_rate = Set(outcome.efficiency_rate);
        active_model.status = Set(outcome.status);
        active_model.cost_per_unit = Set(outcome.cost_per_unit);
        active_model.annual_waste = Set(outcome.annual_waste);
        active_model.reference_snapshot_value = Set(outcome.reference_snapshot_value);
        active_model.evaluated_at = Set(Utc::now());

        Ok(active_model.update(self.db).await?)
    }
}
