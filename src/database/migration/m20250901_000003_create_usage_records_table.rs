use super::{Subscriptions, UsageRecords};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsageRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsageRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::SubscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UsageRecords::UsageYear).integer().not_null())
                    .col(
                        ColumnDef::new(UsageRecords::UsageMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::UsageValue)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsageRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_records_subscription_id")
                            .from(UsageRecords::Table, UsageRecords::SubscriptionId)
                            .to(Subscriptions::Table, Subscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One usage row per subscription and month; concurrent first writes rely on it
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_usage_records_subscription_month")
                    .table(UsageRecords::Table)
                    .col(UsageRecords::SubscriptionId)
                    .col(UsageRecords::UsageYear)
                    .col(UsageRecords::UsageMonth)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsageRecords::Table).to_owned())
            .await
    }
}
