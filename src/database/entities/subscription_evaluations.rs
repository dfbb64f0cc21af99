use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Verdict on one month of usage
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    /// Not used at all this month
    #[sea_orm(string_value = "GHOST")]
    Ghost,
    #[sea_orm(string_value = "EFFICIENT")]
    Efficient,
    #[sea_orm(string_value = "KEEP")]
    Keep,
    #[sea_orm(string_value = "REVIEW")]
    Review,
    #[sea_orm(string_value = "INEFFICIENT")]
    Inefficient,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "subscription_evaluations")]
#[schema(as = SubscriptionEvaluation)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subscription_id: i32,
    pub eval_year: i32,
    pub eval_month: i32,
    /// Usage as a percentage of the category reference
    pub efficiency_rate: f64,
    pub status: EvaluationStatus,
    pub cost_per_unit: i64,
    pub annual_waste: i64,
    /// Category reference value at the time this row was computed
    pub reference_snapshot_value: i32,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subscriptions::Entity",
        from = "Column::SubscriptionId",
        to = "super::subscriptions::Column::Id",
        on_delete = "Cascade"
    )]
    Subscription,
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
