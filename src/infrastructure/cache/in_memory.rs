use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::SchedulerStatus,
    repositories::{CacheRepository, MessageSentInfo},
};

/// Process-local status cache. Entries never expire.
#[derive(Default)]
pub struct InMemoryCacheRepository {
    sent: Arc<RwLock<HashMap<Uuid, MessageSentInfo>>>,
    scheduler_status: Arc<RwLock<Option<SchedulerStatus>>>,
}

impl InMemoryCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheRepository for InMemoryCacheRepository {
    async fn set_message_sent(
        &self,
        message_id: Uuid,
        external_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut sent = self.sent.write().await;
        sent.insert(
            message_id,
            MessageSentInfo {
                external_id: external_id.to_string(),
                sent_at,
            },
        );
        Ok(())
    }

    async fn get_message_sent(&self, message_id: Uuid) -> anyhow::Result<Option<MessageSentInfo>> {
        let sent = self.sent.read().await;
        Ok(sent.get(&message_id).cloned())
    }

    async fn set_scheduler_status(&self, status: SchedulerStatus) -> anyhow::Result<()> {
        *self.scheduler_status.write().await = Some(status);
        Ok(())
    }

    async fn get_scheduler_status(&self) -> anyhow::Result<Option<SchedulerStatus>> {
        Ok(*self.scheduler_status.read().await)
    }
}
