//! Cross-group quarantine.
//!
//! Locking removes the user from every other chat they were seen in;
//! unlocking only flips the flag, removed users have to rejoin on their own.

use sea_orm::{DatabaseConnection, DbErr};

use super::utils::{is_locked, mark_locked, mark_unlocked};
use crate::{
    memberships::utils::{chats_of_user, forget_membership},
    platform::{ChatPlatform, PlatformError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    Locked { evicted: Vec<i64>, failed: Vec<i64> },
    AlreadyLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    NotLocked,
}

#[derive(Debug)]
enum EvictionError {
    NoAdminRights,
    Platform(PlatformError),
}

impl From<PlatformError> for EvictionError {
    fn from(err: PlatformError) -> Self {
        EvictionError::Platform(err)
    }
}

/// Ban followed by an unban: the user is out of the chat but not blacklisted.
async fn evict(
    platform: &dyn ChatPlatform,
    chat_id: i64,
    user_id: u64,
) -> Result<(), EvictionError> {
    if !platform.can_moderate(chat_id).await? {
        return Err(EvictionError::NoAdminRights);
    }
    platform.ban_member(chat_id, user_id).await?;
    if let Err(err) = platform.unban_member(chat_id, user_id).await {
        log::warn!(
            "User {} stays banned in chat {}, unban failed: {}",
            user_id,
            chat_id,
            err
        );
    }
    Ok(())
}

pub async fn lock(
    connection: &DatabaseConnection,
    platform: &dyn ChatPlatform,
    user_id: u64,
    exempt_chat_id: i64,
) -> Result<LockOutcome, DbErr> {
    if is_locked(connection, user_id).await? {
        return Ok(LockOutcome::AlreadyLocked);
    }

    let mut evicted = vec![];
    let mut failed = vec![];
    for chat_id in chats_of_user(connection, user_id).await? {
        if chat_id == exempt_chat_id {
            continue;
        }
        match evict(platform, chat_id, user_id).await {
            Ok(()) => {
                log::info!("Removed user {} from chat {}", user_id, chat_id);
                if let Err(err) = forget_membership(connection, user_id, chat_id).await {
                    log::error!(
                        "Can't forget membership of user {} in chat {}: {}",
                        user_id,
                        chat_id,
                        err
                    );
                }
                evicted.push(chat_id);
            }
            Err(EvictionError::NoAdminRights) => {
                log::warn!(
                    "Can't remove user {} from chat {}: bot is not an admin there",
                    user_id,
                    chat_id
                );
                failed.push(chat_id);
            }
            Err(EvictionError::Platform(err)) => {
                log::warn!(
                    "Can't remove user {} from chat {}: {}",
                    user_id,
                    chat_id,
                    err
                );
                failed.push(chat_id);
            }
        }
    }

    mark_locked(connection, user_id, exempt_chat_id).await?;
    Ok(LockOutcome::Locked { evicted, failed })
}

pub async fn unlock(connection: &DatabaseConnection, user_id: u64) -> Result<UnlockOutcome, DbErr> {
    if !is_locked(connection, user_id).await? {
        return Ok(UnlockOutcome::NotLocked);
    }
    mark_unlocked(connection, user_id).await?;
    Ok(UnlockOutcome::Unlocked)
}
