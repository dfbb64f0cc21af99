use crate::database::DatabaseResult;
use crate::database::entities::{
    Subscription, subscription_evaluations, subscriptions, usage_records,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Subscriptions DAO for database operations
pub struct SubscriptionsDao<'c, C> {
    db: &'c C,
}

impl<'c, C> SubscriptionsDao<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Find subscription by ID
    pub async fn find_by_id(&self, subscription_id: i32) -> DatabaseResult<Option<Subscription>> {
        Ok(subscriptions::Entity::find_by_id(subscription_id)
            .one(self.db)
            .await?)
    }

    /// Load several subscriptions at once
    pub async fn find_by_ids(&self, ids: &[i32]) -> DatabaseResult<Vec<Subscription>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(subscriptions::Entity::find()
            .filter(subscriptions::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?)
    }

    /// All subscriptions ordered by ID
    pub async fn list(&self) -> DatabaseResult<Vec<Subscription>> {
        Ok(subscriptions::Entity::find()
            .order_by_asc(subscriptions::Column::Id)
            .all(self.db)
            .await?)
    }

    /// Insert a subscription; the ID of the argument is ignored
    pub async fn create(&self, subscription: &Subscription) -> DatabaseResult<Subscription> {
        let active_model = subscriptions::ActiveModel {
            id: ActiveValue::NotSet,
            category_id: Set(subscription.category_id),
            name: Set(subscription.name.clone()),
            total_cost: Set(subscription.total_cost),
            user_share_cost: Set(subscription.user_share_cost),
            monthly_share_cost: Set(subscription.monthly_share_cost),
            billing_cycle: Set(subscription.billing_cycle),
            status: Set(subscription.status),
            created_at: Set(subscription.created_at),
        };

        Ok(active_model.insert(self.db).await?)
    }
}

impl<'c, C> SubscriptionsDao<'c, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    /// Delete a subscription with its usage and evaluation history.
    ///
    /// Returns false when no subscription has the given ID.
    pub async fn delete(&self, subscription_id: i32) -> DatabaseResult<bool> {
        let txn = self.db.begin().await?;

        // SQLite only honours the FK cascade with foreign_keys enabled
        usage_records::Entity::delete_many()
            .filter(usage_records::Column::SubscriptionId.eq(subscription_id))
            .exec(&txn)
            .await?;
        subscription_evaluations::Entity::delete_many()
            .filter(subscription_evaluations::Column::SubscriptionId.eq(subscription_id))
            .exec(&txn)
            .await?;
        let result = subscriptions::Entity::delete_by_id(subscription_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
