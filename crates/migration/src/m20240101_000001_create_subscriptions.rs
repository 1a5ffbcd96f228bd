//! Create `subscriptions` table.
//!
//! `start_date` / `end_date` hold `MM-YYYY` text; `user_id` references an external identity (no FK).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(integer(Subscriptions::Id).primary_key().auto_increment())
                    .col(text(Subscriptions::ServiceName).not_null())
                    .col(integer(Subscriptions::Price).not_null())
                    .col(uuid(Subscriptions::UserId).not_null())
                    .col(text(Subscriptions::StartDate).not_null())
                    .col(text_null(Subscriptions::EndDate))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
}
