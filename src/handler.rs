use std::error::Error;
use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
    types::CallbackQuery,
};
use tera::Tera;

use crate::{
    commands::{
        registration::{
            ask_for_form, cancel, prompt_start, receive_cover, receive_form, receive_portrait,
            receive_song, ReviewSettings,
        },
        review::{handle_review, parse_review_action},
        start::{show_help, show_start_info},
        triggers::{handle_clear, handle_list, handle_set},
        Command,
    },
    keyboards::CREATE_PROFILE,
    memberships::utils::record_membership,
    router::route_text,
    services::Services,
    types::{HandlerResult, IncomingMessage, RegistrationDialogue, RegistrationState},
};

async fn start_endpoint(
    bot: Bot,
    message: Message,
    dialogue: RegistrationDialogue,
    tera: Arc<Tera>,
) -> HandlerResult {
    show_start_info(&bot, &message, &dialogue, &tera).await
}

async fn help_endpoint(bot: Bot, message: Message) -> HandlerResult {
    show_help(&bot, &message).await
}

async fn set_endpoint(services: Services, message: Message, args: String) -> HandlerResult {
    if let Some(message) = IncomingMessage::from_message(&message) {
        handle_set(&services, &message, &args).await?;
    }
    Ok(())
}

async fn list_endpoint(services: Services, message: Message) -> HandlerResult {
    if let Some(message) = IncomingMessage::from_message(&message) {
        handle_list(&services, &message).await?;
    }
    Ok(())
}

async fn clear_endpoint(services: Services, message: Message) -> HandlerResult {
    if let Some(message) = IncomingMessage::from_message(&message) {
        handle_clear(&services, &message).await?;
    }
    Ok(())
}

async fn cancel_endpoint(bot: Bot, message: Message, dialogue: RegistrationDialogue) -> HandlerResult {
    cancel(&bot, &message, &dialogue).await
}

/// Commands skip the router, so their senders are recorded here.
async fn record_command_sender(services: Services, message: Message) {
    let Some(message) = IncomingMessage::from_message(&message) else {
        return;
    };
    if !message.is_group {
        return;
    }
    if let Err(err) =
        record_membership(&services.connection, message.user_id, message.chat_id).await
    {
        log::error!(
            "Can't record membership of user {} in chat {}: {}",
            message.user_id,
            message.chat_id,
            err
        );
    }
}

async fn group_text_endpoint(services: Services, message: IncomingMessage) -> HandlerResult {
    route_text(&services, &message).await?;
    Ok(())
}

async fn create_profile_endpoint(
    bot: Bot,
    query: CallbackQuery,
    dialogue: RegistrationDialogue,
    review: ReviewSettings,
    tera: Arc<Tera>,
) -> HandlerResult {
    let in_private = query
        .message
        .as_ref()
        .map_or(false, |message| message.chat.is_private());
    bot.answer_callback_query(query.id).await?;
    if in_private {
        ask_for_form(&bot, dialogue.chat_id(), &dialogue, &review, &tera).await?;
    }
    Ok(())
}

pub fn schema() -> UpdateHandler<Box<dyn Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .inspect_async(record_command_sender)
        .branch(case![Command::Start].endpoint(start_endpoint))
        .branch(case![Command::Help].endpoint(help_endpoint))
        .branch(case![Command::Set(args)].endpoint(set_endpoint))
        .branch(case![Command::List].endpoint(list_endpoint))
        .branch(case![Command::Clear].endpoint(clear_endpoint))
        .branch(case![Command::Cancel].endpoint(cancel_endpoint));

    let group_handler = dptree::filter(|message: Message| {
        message.chat.is_group() || message.chat.is_supergroup()
    })
    .filter_map(|message: Message| IncomingMessage::from_message(&message))
    .endpoint(group_text_endpoint);

    let registration_handler = dptree::filter(|message: Message| message.chat.is_private())
        .branch(case![RegistrationState::AwaitingForm].endpoint(receive_form))
        .branch(case![RegistrationState::AwaitingPortrait { form }].endpoint(receive_portrait))
        .branch(case![RegistrationState::AwaitingSong { form, portrait }].endpoint(receive_song))
        .branch(
            case![RegistrationState::AwaitingCover {
                form,
                portrait,
                song
            }]
            .endpoint(receive_cover),
        )
        .branch(case![RegistrationState::Idle].endpoint(prompt_start));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(group_handler)
        .branch(registration_handler);

    let callback_handler = Update::filter_callback_query()
        .branch(
            dptree::filter(|query: CallbackQuery| query.data.as_deref() == Some(CREATE_PROFILE))
                .endpoint(create_profile_endpoint),
        )
        .branch(
            dptree::filter_map(|query: CallbackQuery| {
                query.data.as_deref().and_then(parse_review_action)
            })
            .endpoint(handle_review),
        );

    dialogue::enter::<Update, InMemStorage<RegistrationState>, RegistrationState, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use serde_json::json;
    use teloxide::types::Me;

    use super::*;
    use crate::{
        memberships::utils::chats_of_user,
        services::Signals,
        testing::{test_connection, FakePlatform, RecordingScheduler},
    };

    const CHAT: i64 = -100123;
    const USER: u64 = 501;

    fn me() -> Me {
        serde_json::from_value(json!({
            "id": 1,
            "is_bot": true,
            "first_name": "Druid",
            "username": "druid_bot",
            "can_join_groups": true,
            "can_read_all_group_messages": true,
            "supports_inline_queries": false
        }))
        .unwrap()
    }

    fn group_update(text: &str) -> Update {
        let mut message = json!({
            "message_id": 7,
            "date": 1700000000,
            "chat": { "id": CHAT, "type": "supergroup", "title": "Eclis" },
            "from": { "id": USER, "is_bot": false, "first_name": "Arwen" },
            "text": text
        });
        if let Some(command) = text.strip_prefix('/') {
            message["entities"] = json!([
                { "type": "bot_command", "offset": 0, "length": command.len() + 1 }
            ]);
        }
        serde_json::from_str(&json!({ "update_id": 1, "message": message }).to_string()).unwrap()
    }

    async fn services(platform: Arc<FakePlatform>) -> Services {
        Services {
            connection: Arc::new(test_connection().await),
            platform,
            scheduler: Arc::new(RecordingScheduler::default()),
            signals: Signals::new("#enter", "#exit"),
            triggers_admin_only: true,
        }
    }

    async fn dispatch(services: &Services, text: &str) {
        let result = schema()
            .dispatch(dptree::deps![
                group_update(text),
                me(),
                services.clone(),
                InMemStorage::<RegistrationState>::new()
            ])
            .await;
        assert!(matches!(result, ControlFlow::Break(Ok(()))));
    }

    #[tokio::test]
    async fn group_commands_record_their_sender() {
        let platform = Arc::new(FakePlatform::new());
        let services = services(platform.clone()).await;

        dispatch(&services, "/list").await;

        assert_eq!(
            chats_of_user(&services.connection, USER).await.unwrap(),
            vec![CHAT]
        );
        assert_eq!(platform.sent().len(), 1);
    }

    #[tokio::test]
    async fn commands_and_text_share_one_membership_row() {
        let platform = Arc::new(FakePlatform::new());
        let services = services(platform.clone()).await;

        dispatch(&services, "hello").await;
        dispatch(&services, "/list").await;

        assert_eq!(
            chats_of_user(&services.connection, USER).await.unwrap(),
            vec![CHAT]
        );
    }
}
