use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::{Message, MessageStatus, SchedulerStatus};

/// Persistent store of message records.
///
/// `get_by_id`, `update` and `delete` fail with
/// [`DomainError::MessageNotFound`](crate::domain::errors::DomainError::MessageNotFound)
/// when no record matches.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> anyhow::Result<()>;

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Message>;

    /// Pending messages, oldest first.
    async fn get_pending(&self, limit: usize) -> anyhow::Result<Vec<Message>>;

    /// Sent messages, most recently sent first.
    async fn get_sent(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>>;

    async fn get_all(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>>;

    async fn update(&self, message: &Message) -> anyhow::Result<()>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;

    async fn count_by_status(&self, status: MessageStatus) -> anyhow::Result<u64>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSentInfo {
    pub external_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Best-effort side channel for last-known delivery and scheduler state.
///
/// Callers log failures from these methods and carry on.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    async fn set_message_sent(
        &self,
        message_id: Uuid,
        external_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn get_message_sent(&self, message_id: Uuid) -> anyhow::Result<Option<MessageSentInfo>>;

    async fn set_scheduler_status(&self, status: SchedulerStatus) -> anyhow::Result<()>;

    async fn get_scheduler_status(&self) -> anyhow::Result<Option<SchedulerStatus>>;
}
