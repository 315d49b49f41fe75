use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::Config, platform::ChatPlatform, scheduler::Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Lock,
    Unlock,
}

/// The two control hashtags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signals {
    pub lock: String,
    pub unlock: String,
}

impl Signals {
    pub fn new(lock: &str, unlock: &str) -> Self {
        Signals {
            lock: lock.to_lowercase(),
            unlock: unlock.to_lowercase(),
        }
    }

    /// The lock hashtag wins when a message carries both. Punctuation around
    /// a token is ignored.
    pub fn detect(&self, text: &str) -> Option<Signal> {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                token
                    .trim_matches(|c: char| !(c.is_alphanumeric() || c == '#' || c == '_'))
                    .to_lowercase()
            })
            .collect();
        if tokens.iter().any(|token| *token == self.lock) {
            Some(Signal::Lock)
        } else if tokens.iter().any(|token| *token == self.unlock) {
            Some(Signal::Unlock)
        } else {
            None
        }
    }
}

/// Everything the group handlers need, shared through dptree dependencies.
#[derive(Clone)]
pub struct Services {
    pub connection: Arc<DatabaseConnection>,
    pub platform: Arc<dyn ChatPlatform>,
    pub scheduler: Arc<dyn Scheduler>,
    pub signals: Signals,
    pub triggers_admin_only: bool,
}

impl Services {
    pub fn new(
        connection: Arc<DatabaseConnection>,
        platform: Arc<dyn ChatPlatform>,
        scheduler: Arc<dyn Scheduler>,
        config: &Config,
    ) -> Self {
        Services {
            connection,
            platform,
            scheduler,
            signals: Signals::new(&config.lock_hashtag, &config.unlock_hashtag),
            triggers_admin_only: config.triggers_admin_only,
        }
    }
}
