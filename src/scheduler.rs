use std::sync::Arc;
use std::time::Duration;

use crate::platform::ChatPlatform;

/// A reply that must be sent `delay` after it was scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedReply {
    pub chat_id: i64,
    pub reply_to: i32,
    pub text: String,
    pub delay: Duration,
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, job: DelayedReply);
}

/// Runs each job as a detached tokio task. Jobs can't be cancelled.
pub struct TokioScheduler {
    platform: Arc<dyn ChatPlatform>,
}

impl TokioScheduler {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        TokioScheduler { platform }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, job: DelayedReply) {
        let platform = self.platform.clone();
        tokio::spawn(async move {
            tokio::time::sleep(job.delay).await;
            if let Err(err) = platform
                .send_text(job.chat_id, &job.text, Some(job.reply_to))
                .await
            {
                log::error!(
                    "Delayed reply to message {} in chat {} failed: {}",
                    job.reply_to,
                    job.chat_id,
                    err
                );
            }
        });
    }
}
