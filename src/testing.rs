use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{
    connection,
    platform::{ChatPlatform, MemberStatus, PlatformError},
    scheduler::{DelayedReply, Scheduler},
};

pub async fn test_connection() -> DatabaseConnection {
    connection::init("sqlite::memory:").await.unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    MemberStatus { chat_id: i64, user_id: u64 },
    CanModerate(i64),
    Ban { chat_id: i64, user_id: u64 },
    Unban { chat_id: i64, user_id: u64 },
    Send { chat_id: i64, text: String, reply_to: Option<i32> },
}

/// Records every call; the bot is admin only in `moderated` chats.
#[derive(Default)]
pub struct FakePlatform {
    calls: Mutex<Vec<Call>>,
    moderated: HashSet<i64>,
    admins: HashSet<(i64, u64)>,
    rejected_bans: HashSet<i64>,
    failing_sends: bool,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moderating(mut self, chats: &[i64]) -> Self {
        self.moderated.extend(chats);
        self
    }

    /// The bot is admin in `chats`, but Telegram still refuses the ban.
    pub fn rejecting_bans(mut self, chats: &[i64]) -> Self {
        self.rejected_bans.extend(chats);
        self
    }

    pub fn with_admin(mut self, chat_id: i64, user_id: u64) -> Self {
        self.admins.insert((chat_id, user_id));
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.failing_sends = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bans(&self) -> Vec<(i64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Ban { chat_id, user_id } => Some((chat_id, user_id)),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<(i64, String, Option<i32>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send {
                    chat_id,
                    text,
                    reply_to,
                } => Some((chat_id, text, reply_to)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, PlatformError> {
        self.record(Call::MemberStatus { chat_id, user_id });
        if self.admins.contains(&(chat_id, user_id)) {
            Ok(MemberStatus::Administrator)
        } else {
            Ok(MemberStatus::Member)
        }
    }

    async fn can_moderate(&self, chat_id: i64) -> Result<bool, PlatformError> {
        self.record(Call::CanModerate(chat_id));
        Ok(self.moderated.contains(&chat_id))
    }

    async fn ban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError> {
        self.record(Call::Ban { chat_id, user_id });
        if self.moderated.contains(&chat_id) && !self.rejected_bans.contains(&chat_id) {
            Ok(())
        } else {
            Err(PlatformError::Rejected("not enough rights".to_string()))
        }
    }

    async fn unban_member(&self, chat_id: i64, user_id: u64) -> Result<(), PlatformError> {
        self.record(Call::Unban { chat_id, user_id });
        Ok(())
    }

    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<(), PlatformError> {
        self.record(Call::Send {
            chat_id,
            text: text.to_string(),
            reply_to,
        });
        if self.failing_sends {
            Err(PlatformError::Rejected("chat not found".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct RecordingScheduler {
    jobs: Mutex<Vec<DelayedReply>>,
}

impl RecordingScheduler {
    pub fn jobs(&self) -> Vec<DelayedReply> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, job: DelayedReply) {
        self.jobs.lock().unwrap().push(job);
    }
}
