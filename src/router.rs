use crate::{
    entity::triggers,
    error::BotError,
    locks::coordinator::{lock, unlock, LockOutcome, UnlockOutcome},
    memberships::utils::record_membership,
    services::{Services, Signal},
    triggers::dispatcher::dispatch_trigger,
    types::IncomingMessage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Lock(LockOutcome),
    Unlock(UnlockOutcome),
    Trigger(triggers::Model),
    Ignored,
}

fn lock_notice(outcome: &LockOutcome) -> String {
    match outcome {
        LockOutcome::Locked { evicted, .. } => format!(
            "🔒 You are locked in this group now. Removed from {} other group(s).",
            evicted.len()
        ),
        LockOutcome::AlreadyLocked => "⚠️ You are already locked.".to_string(),
    }
}

fn unlock_notice(outcome: UnlockOutcome) -> String {
    match outcome {
        UnlockOutcome::Unlocked => {
            "🔓 You are unlocked. Rejoin the other groups on your own.".to_string()
        }
        UnlockOutcome::NotLocked => "⚠️ You are not locked.".to_string(),
    }
}

/// Entry point for every text message observed in a group.
pub async fn route_text(services: &Services, message: &IncomingMessage) -> Result<Routed, BotError> {
    let connection = services.connection.as_ref();
    let platform = services.platform.as_ref();
    record_membership(connection, message.user_id, message.chat_id).await?;

    match services.signals.detect(&message.text) {
        Some(Signal::Lock) => {
            let outcome = lock(connection, platform, message.user_id, message.chat_id).await?;
            platform
                .send_text(message.chat_id, &lock_notice(&outcome), Some(message.message_id))
                .await?;
            Ok(Routed::Lock(outcome))
        }
        Some(Signal::Unlock) => {
            let outcome = unlock(connection, message.user_id).await?;
            platform
                .send_text(message.chat_id, &unlock_notice(outcome), Some(message.message_id))
                .await?;
            Ok(Routed::Unlock(outcome))
        }
        None => {
            let fired =
                dispatch_trigger(connection, platform, services.scheduler.as_ref(), message).await?;
            Ok(fired.map_or(Routed::Ignored, Routed::Trigger))
        }
    }
}
