use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingCycle {
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    #[sea_orm(string_value = "QUARTERLY")]
    Quarterly,
    #[sea_orm(string_value = "ANNUAL")]
    Annual,
}

impl BillingCycle {
    /// Number of months one payment covers
    pub fn months(&self) -> i64 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Quarterly => 3,
            BillingCycle::Annual => 12,
        }
    }

    /// Normalize a per-cycle amount to a monthly figure, rounded half-up
    pub fn monthly_share_cost(&self, user_share_cost: i64) -> i64 {
        let months = self.months();
        if months == 1 {
            return user_share_cost;
        }
        (user_share_cost as f64 / months as f64).round() as i64
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "ACTIVE")]
    #[default]
    Active,
    #[sea_orm(string_value = "TRIAL")]
    Trial,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl SubscriptionStatus {
    pub fn is_trial(&self) -> bool {
        matches!(self, SubscriptionStatus::Trial)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "subscriptions")]
#[schema(as = Subscription)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    /// Full price of one billing cycle
    pub total_cost: i64,
    /// Part of `total_cost` the tracked user pays
    pub user_share_cost: i64,
    /// `user_share_cost` normalized to one month
    pub monthly_share_cost: i64,
    pub billing_cycle: BillingCycle,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::usage_records::Entity")]
    UsageRecords,
    #[sea_orm(has_many = "super::subscription_evaluations::Entity")]
    Evaluations,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::usage_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsageRecords.def()
    }
}

impl Related<super::subscription_evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a subscription record; the monthly share is derived from the billing cycle
    pub fn new(
        category_id: i32,
        name: impl Into<String>,
        total_cost: i64,
        user_share_cost: i64,
        billing_cycle: BillingCycle,
        status: SubscriptionStatus,
    ) -> Self {
        Self {
            id: 0,
            category_id,
            name: name.into(),
            total_cost,
            user_share_cost,
            monthly_share_cost: billing_cycle.monthly_share_cost(user_share_cost),
            billing_cycle,
            status,
            created_at: Utc::now(),
        }
    }
}
