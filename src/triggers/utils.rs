use sea_orm::{prelude::*, sea_query::OnConflict, ActiveValue, QueryOrder};

use crate::entity::triggers;

pub async fn save_trigger(
    connection: &DatabaseConnection,
    chat_id: i64,
    keyword: &str,
    delay_seconds: u32,
    reply_text: &str,
) -> Result<(), DbErr> {
    triggers::Entity::insert(triggers::ActiveModel {
        chat_id: ActiveValue::Set(chat_id),
        keyword: ActiveValue::Set(keyword.to_lowercase()),
        delay_seconds: ActiveValue::Set(i64::from(delay_seconds)),
        reply_text: ActiveValue::Set(reply_text.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([triggers::Column::ChatId, triggers::Column::Keyword])
            .update_columns([triggers::Column::DelaySeconds, triggers::Column::ReplyText])
            .to_owned(),
    )
    .exec_without_returning(connection)
    .await?;

    Ok(())
}

/// Triggers of a chat in the order they were first registered.
pub async fn chat_triggers(
    connection: &DatabaseConnection,
    chat_id: i64,
) -> Result<Vec<triggers::Model>, DbErr> {
    triggers::Entity::find()
        .filter(triggers::Column::ChatId.eq(chat_id))
        .order_by_asc(triggers::Column::Id)
        .all(connection)
        .await
}

pub async fn clear_triggers(connection: &DatabaseConnection, chat_id: i64) -> Result<u64, DbErr> {
    let result = triggers::Entity::delete_many()
        .filter(triggers::Column::ChatId.eq(chat_id))
        .exec(connection)
        .await?;

    Ok(result.rows_affected)
}
