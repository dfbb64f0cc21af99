use super::{SubscriptionEvaluations, Subscriptions};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionEvaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::SubscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::EvalYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::EvalMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::EfficiencyRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::CostPerUnit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::AnnualWaste)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::ReferenceSnapshotValue)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionEvaluations::EvaluatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_evaluations_subscription_id")
                            .from(
                                SubscriptionEvaluations::Table,
                                SubscriptionEvaluations::SubscriptionId,
                            )
                            .to(Subscriptions::Table, Subscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subscription_evaluations_subscription_month")
                    .table(SubscriptionEvaluations::Table)
                    .col(SubscriptionEvaluations::SubscriptionId)
                    .col(SubscriptionEvaluations::EvalYear)
                    .col(SubscriptionEvaluations::EvalMonth)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Dashboard reads a whole month at a time
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscription_evaluations_period")
                    .table(SubscriptionEvaluations::Table)
                    .col(SubscriptionEvaluations::EvalYear)
                    .col(SubscriptionEvaluations::EvalMonth)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(SubscriptionEvaluations::Table)
                    .to_owned(),
            )
            .await
    }
}
