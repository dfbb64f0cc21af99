use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250901_000001_create_categories_table;
mod m20250901_000002_create_subscriptions_table;
mod m20250901_000003_create_usage_records_table;
mod m20250901_000004_create_subscription_evaluations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_categories_table::Migration),
            Box::new(m20250901_000002_create_subscriptions_table::Migration),
            Box::new(m20250901_000003_create_usage_records_table::Migration),
            Box::new(m20250901_000004_create_subscription_evaluations_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Categories {
    Table,
    Id,
    Name,
    ReferenceValue,
    Unit,
    CategoryType,
}

#[derive(Iden)]
pub enum Subscriptions {
    Table,
    Id,
    CategoryId,
    Name,
    TotalCost,
    UserShareCost,
    MonthlyShareCost,
    BillingCycle,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum UsageRecords {
    Table,
    Id,
    SubscriptionId,
    UsageYear,
    UsageMonth,
    UsageValue,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum SubscriptionEvaluations {
    Table,
    Id,
    SubscriptionId,
    EvalYear,
    EvalMonth,
    EfficiencyRate,
    Status,
    CostPerUnit,
    AnnualWaste,
    ReferenceSnapshotValue,
    EvaluatedAt,
}
