use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LockStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LockStatuses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LockStatuses::UserId)
                            .unique_key()
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LockStatuses::IsLocked).boolean().not_null())
                    .col(ColumnDef::new(LockStatuses::HomeChatId).big_integer().null())
                    .col(ColumnDef::new(LockStatuses::LockedAt).date_time().null())
                    .col(ColumnDef::new(LockStatuses::UnlockedAt).date_time().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LockStatuses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LockStatuses {
    Table,
    Id,
    UserId,
    IsLocked,
    HomeChatId,
    LockedAt,
    UnlockedAt,
}
