use std::error::Error;

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::Message;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Platform-independent view of an inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub user_id: u64,
    pub message_id: i32,
    pub text: String,
    pub is_group: bool,
}

impl IncomingMessage {
    /// Returns `None` for messages without text or without a sender.
    pub fn from_message(message: &Message) -> Option<Self> {
        let user = message.from()?;
        let text = message.text()?;
        Some(IncomingMessage {
            chat_id: message.chat.id.0,
            user_id: user.id.0,
            message_id: message.id.0,
            text: text.to_string(),
            is_group: message.chat.is_group() || message.chat.is_supergroup(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Portrait {
    Sticker(String),
    Photo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub file_id: String,
    pub title: Option<String>,
    pub performer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegistrationState {
    #[default]
    Idle,
    AwaitingForm,
    AwaitingPortrait {
        form: String,
    },
    AwaitingSong {
        form: String,
        portrait: Portrait,
    },
    AwaitingCover {
        form: String,
        portrait: Portrait,
        song: Song,
    },
}

pub type RegistrationDialogue = Dialogue<RegistrationState, InMemStorage<RegistrationState>>;
