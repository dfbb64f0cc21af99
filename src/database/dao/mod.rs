pub mod categories;
pub mod evaluations;
pub mod subscriptions;
pub mod usage;

pub use categories::CategoriesDao;
pub use evaluations::EvaluationsDao;
pub use subscriptions::SubscriptionsDao;
pub use usage::UsageDao;

use crate::database::{DatabaseError, DatabaseResult};
use crate::metrics;
use crate::period::UsagePeriod;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, TransactionTrait,
};
use tracing::warn;

/// Unique key of the per-month tables: one row per (subscription, year, month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthlyKey {
    pub subscription_id: i32,
    pub period: UsagePeriod,
}

impl MonthlyKey {
    pub fn new(subscription_id: i32, period: UsagePeriod) -> Self {
        Self {
            subscription_id,
            period,
        }
    }
}

/// A table keyed by [`MonthlyKey`] that supports the optimistic upsert protocol
#[async_trait]
pub trait MonthlyRecordStore: Send + Sync {
    type Record: Send;
    type Values: Send + Sync;

    /// Table name, for logs and metrics
    const TABLE: &'static str;

    async fn find_by_key(&self, key: &MonthlyKey) -> DatabaseResult<Option<Self::Record>>;

    /// Insert a new row and flush immediately. A concurrent insert of the same key
    /// surfaces here as [`DatabaseError::Conflict`].
    async fn insert_flush(
        &self,
        key: &MonthlyKey,
        values: &Self::Values,
    ) -> DatabaseResult<Self::Record>;

    /// Overwrite an existing row with new values
    async fn apply(&self, existing: Self::Record, values: &Self::Values)
    -> DatabaseResult<Self::Record>;
}

/// Optimistic insert-then-recover upsert.
///
/// Existing rows are updated in place. Otherwise the row is inserted; if a
/// concurrent writer inserted the same key first, the winner's row is re-read and
/// overwritten, so the last committed write wins and the key never duplicates.
/// Any other storage failure is returned unchanged.
pub async fn upsert_monthly<S>(
    store: &S,
    key: &MonthlyKey,
    values: &S::Values,
) -> DatabaseResult<S::Record>
where
    S: MonthlyRecordStore,
{
    if let Some(existing) = store.find_by_key(key).await? {
        return store.apply(existing, values).await;
    }

    match store.insert_flush(key, values).await {
        Ok(record) => Ok(record),
        Err(DatabaseError::Conflict(detail)) => {
            warn!(
                table = S::TABLE,
                subscription_id = key.subscription_id,
                period = %key.period,
                "Concurrent insert detected, updating the existing row instead: {}",
                detail
            );
            metrics::track_upsert_conflict(S::TABLE);

            let existing = store
                .find_by_key(key)
                .await?
                .ok_or(DatabaseError::NotFound)?;
            store.apply(existing, values).await
        }
        Err(e) => Err(e),
    }
}

/// Insert inside a savepoint so a constraint violation leaves the enclosing
/// transaction usable (PostgreSQL aborts the whole transaction otherwise).
pub(crate) async fn insert_in_savepoint<C, A>(
    db: &C,
    model: A,
) -> DatabaseResult<<A::Entity as EntityTrait>::Model>
where
    C: TransactionTrait + Sync,
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Send,
{
    let savepoint = db.begin().await?;

    match model.insert(&savepoint).await {
        Ok(inserted) => {
            savepoint.commit().await?;
            Ok(inserted)
        }
        Err(e) => {
            let err = DatabaseError::from(e);
            savepoint.rollback().await?;
            Err(err)
        }
    }
}
