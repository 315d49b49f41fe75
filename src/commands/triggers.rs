use crate::{
    entity::triggers,
    error::BotError,
    services::Services,
    triggers::{
        args::{parse_set_args, SetArgsError},
        utils::{chat_triggers, clear_triggers, save_trigger},
    },
    types::IncomingMessage,
};

const GROUP_ONLY: &str = "⚠️ This command only works in groups.";
const ADMINS_ONLY: &str = "⛔ Only group admins can change triggers.";
const SET_USAGE: &str = "Usage: /set <keyword> <delaySeconds> <message>";

async fn reply(services: &Services, message: &IncomingMessage, text: &str) -> Result<(), BotError> {
    services
        .platform
        .send_text(message.chat_id, text, Some(message.message_id))
        .await?;
    Ok(())
}

/// Returns the refusal to send back, if any.
async fn check_permissions(
    services: &Services,
    message: &IncomingMessage,
    changes_triggers: bool,
) -> Result<Option<&'static str>, BotError> {
    if !message.is_group {
        return Ok(Some(GROUP_ONLY));
    }
    if changes_triggers && services.triggers_admin_only {
        let status = services
            .platform
            .member_status(message.chat_id, message.user_id)
            .await?;
        if !status.is_privileged() {
            return Ok(Some(ADMINS_ONLY));
        }
    }
    Ok(None)
}

/// Telegram's limit for one message, in UTF-16 code units.
const MESSAGE_LIMIT: usize = 4096;
const KEYWORD_PREVIEW: usize = 64;
const REPLY_PREVIEW: usize = 300;
const NO_TRIGGERS: &str = "📭 No triggers in this group.";
const LIST_HEADER: &str = "📋 Triggers of this group:";

fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        format!("{}…", text.chars().take(limit).collect::<String>())
    }
}

/// Splits the listing into messages Telegram accepts; long texts are cut short.
pub fn format_trigger_list(triggers: &[triggers::Model]) -> Vec<String> {
    if triggers.is_empty() {
        return vec![NO_TRIGGERS.to_string()];
    }

    let mut pages = vec![];
    let mut page = LIST_HEADER.to_string();
    for (index, trigger) in triggers.iter().enumerate() {
        let line = format!(
            "{}. {} ({}s) → {}",
            index + 1,
            preview(&trigger.keyword, KEYWORD_PREVIEW),
            trigger.delay_seconds,
            preview(&trigger.reply_text, REPLY_PREVIEW)
        );
        if message_len(&page) + 1 + message_len(&line) > MESSAGE_LIMIT {
            pages.push(std::mem::replace(&mut page, line));
        } else {
            page.push('\n');
            page.push_str(&line);
        }
    }
    pages.push(page);
    pages
}

pub async fn handle_set(
    services: &Services,
    message: &IncomingMessage,
    args: &str,
) -> Result<(), BotError> {
    if let Some(refusal) = check_permissions(services, message, true).await? {
        return reply(services, message, refusal).await;
    }

    let trigger = match parse_set_args(args) {
        Ok(trigger) => trigger,
        Err(SetArgsError::MissingArguments) => {
            return reply(services, message, SET_USAGE).await;
        }
        Err(err @ SetArgsError::InvalidDelay(_)) => {
            return reply(services, message, &format!("⚠️ The {}.\n{}", err, SET_USAGE)).await;
        }
    };

    save_trigger(
        &services.connection,
        message.chat_id,
        &trigger.keyword,
        trigger.delay_seconds,
        &trigger.reply_text,
    )
    .await?;
    log::info!(
        "Saved trigger {:?} in chat {}",
        trigger.keyword,
        message.chat_id
    );

    let confirmation = format!(
        "✅ Trigger \"{}\" saved: I'll answer {} seconds after it shows up.",
        trigger.keyword, trigger.delay_seconds
    );
    reply(services, message, &confirmation).await
}

pub async fn handle_list(services: &Services, message: &IncomingMessage) -> Result<(), BotError> {
    if let Some(refusal) = check_permissions(services, message, false).await? {
        return reply(services, message, refusal).await;
    }
    let triggers = chat_triggers(&services.connection, message.chat_id).await?;
    for page in format_trigger_list(&triggers) {
        reply(services, message, &page).await?;
    }
    Ok(())
}

pub async fn handle_clear(services: &Services, message: &IncomingMessage) -> Result<(), BotError> {
    if let Some(refusal) = check_permissions(services, message, true).await? {
        return reply(services, message, refusal).await;
    }
    let removed = clear_triggers(&services.connection, message.chat_id).await?;
    log::info!("Cleared {} trigger(s) in chat {}", removed, message.chat_id);
    reply(services, message, &format!("🧹 Removed {} trigger(s).", removed)).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        services::Signals,
        testing::{test_connection, FakePlatform, RecordingScheduler},
    };

    const ADMIN: u64 = 1;
    const MEMBER: u64 = 2;
    const CHAT: i64 = -500;

    async fn services(platform: Arc<FakePlatform>, admin_only: bool) -> Services {
        Services {
            connection: Arc::new(test_connection().await),
            platform,
            scheduler: Arc::new(RecordingScheduler::default()),
            signals: Signals::new("#enter", "#exit"),
            triggers_admin_only: admin_only,
        }
    }

    fn command(chat_id: i64, user_id: u64, is_group: bool) -> IncomingMessage {
        IncomingMessage {
            chat_id,
            user_id,
            message_id: 10,
            text: String::new(),
            is_group,
        }
    }

    fn last_reply(platform: &FakePlatform) -> String {
        platform.sent().last().map(|(_, text, _)| text.clone()).unwrap()
    }

    #[tokio::test]
    async fn set_then_list() {
        let platform = Arc::new(FakePlatform::new().with_admin(CHAT, ADMIN));
        let services = services(platform.clone(), true).await;

        handle_set(&services, &command(CHAT, ADMIN, true), "party 5 welcome-to-the-party")
            .await
            .unwrap();
        handle_list(&services, &command(CHAT, MEMBER, true)).await.unwrap();

        assert_eq!(
            last_reply(&platform),
            "📋 Triggers of this group:\n1. party (5s) → welcome-to-the-party"
        );
    }

    #[tokio::test]
    async fn malformed_delay_leaves_store_untouched() {
        let platform = Arc::new(FakePlatform::new().with_admin(CHAT, ADMIN));
        let services = services(platform.clone(), true).await;

        handle_set(&services, &command(CHAT, ADMIN, true), "party soon hello")
            .await
            .unwrap();

        assert!(last_reply(&platform).contains("\"soon\""));
        assert!(chat_triggers(&services.connection, CHAT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_admins_are_refused_when_gated() {
        let platform = Arc::new(FakePlatform::new());
        let gated = services(platform.clone(), true).await;

        handle_set(&gated, &command(CHAT, MEMBER, true), "party 5 hi").await.unwrap();
        assert_eq!(last_reply(&platform), ADMINS_ONLY);
        assert!(chat_triggers(&gated.connection, CHAT).await.unwrap().is_empty());

        let open = services(platform.clone(), false).await;
        handle_set(&open, &command(CHAT, MEMBER, true), "party 5 hi").await.unwrap();
        assert_eq!(chat_triggers(&open.connection, CHAT).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trigger_commands_refuse_private_chats() {
        let platform = Arc::new(FakePlatform::new());
        let services = services(platform.clone(), false).await;

        handle_list(&services, &command(77, MEMBER, false)).await.unwrap();

        assert_eq!(last_reply(&platform), GROUP_ONLY);
    }

    #[tokio::test]
    async fn clear_empties_only_the_current_chat() {
        let platform = Arc::new(FakePlatform::new().with_admin(CHAT, ADMIN).with_admin(-600, ADMIN));
        let services = services(platform.clone(), true).await;
        handle_set(&services, &command(CHAT, ADMIN, true), "party 5 a").await.unwrap();
        handle_set(&services, &command(CHAT, ADMIN, true), "cake 1 b").await.unwrap();
        handle_set(&services, &command(-600, ADMIN, true), "party 5 c").await.unwrap();

        handle_clear(&services, &command(CHAT, ADMIN, true)).await.unwrap();
        assert_eq!(last_reply(&platform), "🧹 Removed 2 trigger(s).");

        handle_list(&services, &command(CHAT, ADMIN, true)).await.unwrap();
        assert_eq!(last_reply(&platform), NO_TRIGGERS);
        assert_eq!(chat_triggers(&services.connection, -600).await.unwrap().len(), 1);
    }

    fn trigger(id: i32, keyword: &str, reply_text: &str) -> triggers::Model {
        triggers::Model {
            id,
            chat_id: CHAT,
            keyword: keyword.to_string(),
            delay_seconds: 5,
            reply_text: reply_text.to_string(),
        }
    }

    #[test]
    fn long_listings_are_split_into_pages() {
        let long_reply = "ä".repeat(2100);
        let triggers: Vec<triggers::Model> = (1..=30)
            .map(|id| trigger(id, &format!("word{}", id), &long_reply))
            .collect();

        let pages = format_trigger_list(&triggers);

        assert!(pages.len() > 1);
        assert!(pages.iter().all(|page| message_len(page) <= MESSAGE_LIMIT));
        assert!(pages[0].starts_with(LIST_HEADER));
        assert!(pages.last().unwrap().contains("30. word30 (5s)"));
        let listed: usize = pages
            .iter()
            .map(|page| page.matches(" (5s) → ").count())
            .sum();
        assert_eq!(listed, 30);
    }

    #[tokio::test]
    async fn oversized_replies_still_list() {
        let platform = Arc::new(FakePlatform::new().with_admin(CHAT, ADMIN));
        let services = services(platform.clone(), true).await;
        let long_reply = "x".repeat(2100);
        save_trigger(&services.connection, CHAT, "party", 5, &long_reply)
            .await
            .unwrap();
        save_trigger(&services.connection, CHAT, "cake", 1, &long_reply)
            .await
            .unwrap();

        handle_list(&services, &command(CHAT, MEMBER, true)).await.unwrap();

        let sent = platform.sent();
        assert_eq!(sent.len(), 1);
        assert!(message_len(&sent[0].1) <= MESSAGE_LIMIT);
        assert!(sent[0].1.contains(&format!("{}…", "x".repeat(REPLY_PREVIEW))));
        assert!(sent[0].1.contains("2. cake (1s)"));
    }
}
