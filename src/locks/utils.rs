use chrono::prelude::*;
use sea_orm::{prelude::*, sea_query::OnConflict, ActiveValue};

use crate::entity::lock_statuses;

pub async fn lock_status(
    connection: &DatabaseConnection,
    user_id: u64,
) -> Result<Option<lock_statuses::Model>, DbErr> {
    lock_statuses::Entity::find()
        .filter(lock_statuses::Column::UserId.eq(user_id as i64))
        .one(connection)
        .await
}

pub async fn is_locked(connection: &DatabaseConnection, user_id: u64) -> Result<bool, DbErr> {
    Ok(lock_status(connection, user_id)
        .await?
        .map_or(false, |status| status.is_locked))
}

pub async fn mark_locked(
    connection: &DatabaseConnection,
    user_id: u64,
    home_chat_id: i64,
) -> Result<(), DbErr> {
    lock_statuses::Entity::insert(lock_statuses::ActiveModel {
        user_id: ActiveValue::Set(user_id as i64),
        is_locked: ActiveValue::Set(true),
        home_chat_id: ActiveValue::Set(Some(home_chat_id)),
        locked_at: ActiveValue::Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(lock_statuses::Column::UserId)
            .update_columns([
                lock_statuses::Column::IsLocked,
                lock_statuses::Column::HomeChatId,
                lock_statuses::Column::LockedAt,
            ])
            .to_owned(),
    )
    .exec_without_returning(connection)
    .await?;

    Ok(())
}

pub async fn mark_unlocked(connection: &DatabaseConnection, user_id: u64) -> Result<(), DbErr> {
    lock_statuses::Entity::insert(lock_statuses::ActiveModel {
        user_id: ActiveValue::Set(user_id as i64),
        is_locked: ActiveValue::Set(false),
        home_chat_id: ActiveValue::Set(None),
        unlocked_at: ActiveValue::Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(lock_statuses::Column::UserId)
            .update_columns([
                lock_statuses::Column::IsLocked,
                lock_statuses::Column::HomeChatId,
                lock_statuses::Column::UnlockedAt,
            ])
            .to_owned(),
    )
    .exec_without_returning(connection)
    .await?;

    Ok(())
}
