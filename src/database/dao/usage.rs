use super::{MonthlyKey, MonthlyRecordStore, insert_in_savepoint};
use crate::database::DatabaseResult;
use crate::database::entities::{UsageRecord, usage_records};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Usage records DAO for database operations
pub struct UsageDao<'c, C> {
    db: &'c C,
}

impl<'c, C> UsageDao<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Usage history of one subscription, oldest month first
    pub async fn find_for_subscription(
        &self,
        subscription_id: i32,
    ) -> DatabaseResult<Vec<UsageRecord>> {
        Ok(usage_records::Entity::find()
            .filter(usage_records::Column::SubscriptionId.eq(subscription_id))
            .order_by_asc(usage_records::Column::UsageYear)
            .order_by_asc(usage_records::Column::UsageMonth)
            .all(self.db)
            .await?)
    }
}

#[async_trait]
impl<'c, C> MonthlyRecordStore for UsageDao<'c, C>
where
    C: ConnectionTrait + TransactionTrait + Sync,
{
    type Record = UsageRecord;
    type Values = i32;

    const TABLE: &'static str = "usage_records";

    async fn find_by_key(&self, key: &MonthlyKey) -> DatabaseResult<Option<UsageRecord>> {
        Ok(usage_records::Entity::find()
            .filter(usage_records::Column::SubscriptionId.eq(key.subscription_id))
            .filter(usage_records::Column::UsageYear.eq(key.period.year()))
            .filter(usage_records::Column::UsageMonth.eq(key.period.month_i32()))
            .one(self.db)
            .await?)
    }

    async fn insert_flush(&self, key: &MonthlyKey, usage_value: &i32) -> DatabaseResult<UsageRecord> {
        let now = Utc::now();
        let active_model = usage_records::ActiveModel {
            id: ActiveValue::NotSet,
            subscription_id: Set(key.subscription_id),
            usage_year: Set(key.period.year()),
            usage_month: Set(key.period.month_i32()),
            usage_value: Set(*usage_value),
            created_at: Set(now),
            updated_at: Set(now),
        };

        insert_in_savepoint(self.db, active_model).await
    }

    async fn apply(&self, existing: UsageRecord, usage_value: &i32) -> DatabaseResult<UsageRecord> {
        let mut active_model = usage_records::ActiveModel::from(existing);
        active_model.usage_value = Set(*usage_value);
        active_model.updated_at = Set(Utc::now());

        Ok(active_model.update(self.db).await?)
    }
}
