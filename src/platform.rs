use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatMemberKind, MessageId},
    RequestError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
    #[error("rejected by chat platform: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberStatus::Owner | MemberStatus::Administrator)
    }
}

impl From<&ChatMemberKind> for MemberStatus {
    fn from(kind: &ChatMemberKind) -> Self {
        if kind.is_owner() {
            MemberStatus::Owner
        } else if kind.is_administrator() {
            MemberStatus::Administrator
        } else if kind.is_banned() {
            MemberStatus::Banned
        } else if kind.is_left() {
            MemberStatus::Left
        } else if kind.is_restricted() {
            MemberStatus::Restricted
        } else {
            MemberStatus::Member
        }
    }
}

/// The operations the moderation core needs from the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn member_status(&self, chat_id: i64, user_id: u64)
        -> Result<MemberStatus, PlatformError>;

    /// Whether the bot itself holds admin rights in `chat_id`.
    async fn can_moderate(&self, chat_id: i64) -> Result<bool, PlatformError>;

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError>;

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError>;

    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<(), PlatformError>;
}

#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
    me: UserId,
}

impl TelegramPlatform {
    pub fn new(bot: Bot, me: UserId) -> Self {
        TelegramPlatform { bot, me }
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, PlatformError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await?;
        Ok(MemberStatus::from(&member.kind))
    }

    async fn can_moderate(&self, chat_id: i64) -> Result<bool, PlatformError> {
        let status = self.member_status(chat_id, self.me.0).await?;
        Ok(status.is_privileged())
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError> {
        self.bot
            .ban_chat_member(ChatId(chat_id), UserId(user_id))
            .await?;
        Ok(())
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError> {
        self.bot
            .unban_chat_member(ChatId(chat_id), UserId(user_id))
            .only_if_banned(true)
            .await?;
        Ok(())
    }

    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<(), PlatformError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(message_id) = reply_to {
            request = request.reply_to_message_id(MessageId(message_id));
        }
        request.await?;
        Ok(())
    }
}
