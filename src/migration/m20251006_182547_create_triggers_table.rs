use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Triggers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Triggers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Triggers::ChatId).big_integer().not_null())
                    .col(ColumnDef::new(Triggers::Keyword).string().not_null())
                    .col(
                        ColumnDef::new(Triggers::DelaySeconds)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Triggers::ReplyText).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_triggers_chat_keyword")
                    .table(Triggers::Table)
                    .col(Triggers::ChatId)
                    .col(Triggers::Keyword)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Triggers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Triggers {
    Table,
    Id,
    ChatId,
    Keyword,
    DelaySeconds,
    ReplyText,
}
