use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr};

use super::utils::chat_triggers;
use crate::{
    entity::triggers,
    platform::ChatPlatform,
    scheduler::{DelayedReply, Scheduler},
    types::IncomingMessage,
};

/// First trigger, in storage order, whose keyword occurs anywhere in `text`.
pub fn find_match<'a>(triggers: &'a [triggers::Model], text: &str) -> Option<&'a triggers::Model> {
    let text = text.to_lowercase();
    triggers
        .iter()
        .find(|trigger| !trigger.keyword.is_empty() && text.contains(&trigger.keyword.to_lowercase()))
}

pub fn acknowledgement(delay_seconds: i64) -> String {
    format!("⏳ Got it! I'll answer in {} seconds.", delay_seconds)
}

pub async fn dispatch_trigger(
    connection: &DatabaseConnection,
    platform: &dyn ChatPlatform,
    scheduler: &dyn Scheduler,
    message: &IncomingMessage,
) -> Result<Option<triggers::Model>, DbErr> {
    let triggers = chat_triggers(connection, message.chat_id).await?;
    let Some(trigger) = find_match(&triggers, &message.text) else {
        return Ok(None);
    };

    if let Err(err) = platform
        .send_text(
            message.chat_id,
            &acknowledgement(trigger.delay_seconds),
            Some(message.message_id),
        )
        .await
    {
        log::warn!(
            "Can't acknowledge trigger {:?} in chat {}: {}",
            trigger.keyword,
            message.chat_id,
            err
        );
    }

    scheduler.schedule(DelayedReply {
        chat_id: message.chat_id,
        reply_to: message.message_id,
        text: trigger.reply_text.clone(),
        delay: Duration::from_secs(trigger.delay_seconds.max(0) as u64),
    });

    Ok(Some(trigger.clone()))
}
