use chrono::prelude::*;
use sea_orm::{prelude::*, sea_query::OnConflict, ActiveValue, QueryOrder};

use crate::entity::memberships;

pub async fn record_membership(
    connection: &DatabaseConnection,
    user_id: u64,
    chat_id: i64,
) -> Result<(), DbErr> {
    memberships::Entity::insert(memberships::ActiveModel {
        user_id: ActiveValue::Set(user_id as i64),
        chat_id: ActiveValue::Set(chat_id),
        last_seen_at: ActiveValue::Set(Utc::now().naive_utc()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([memberships::Column::UserId, memberships::Column::ChatId])
            .update_column(memberships::Column::LastSeenAt)
            .to_owned(),
    )
    .exec_without_returning(connection)
    .await?;

    Ok(())
}

pub async fn chats_of_user(
    connection: &DatabaseConnection,
    user_id: u64,
) -> Result<Vec<i64>, DbErr> {
    let chats = memberships::Entity::find()
        .filter(memberships::Column::UserId.eq(user_id as i64))
        .order_by_asc(memberships::Column::Id)
        .all(connection)
        .await?
        .into_iter()
        .map(|membership| membership.chat_id)
        .collect();

    Ok(chats)
}

pub async fn forget_membership(
    connection: &DatabaseConnection,
    user_id: u64,
    chat_id: i64,
) -> Result<(), DbErr> {
    memberships::Entity::delete_many()
        .filter(memberships::Column::UserId.eq(user_id as i64))
        .filter(memberships::Column::ChatId.eq(chat_id))
        .exec(connection)
        .await?;

    Ok(())
}
