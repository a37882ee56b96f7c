use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::domain::{
    models::SchedulerStatus,
    repositories::{CacheRepository, MessageSentInfo},
};

const SENT_INFO_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const SCHEDULER_STATUS_KEY: &str = "scheduler_status";

fn sent_key(message_id: Uuid) -> String {
    format!("message_sent:{message_id}")
}

#[derive(Clone)]
pub struct RedisCacheRepository {
    conn: ConnectionManager,
}

impl RedisCacheRepository {
    /// Connects and pings the server, so an unreachable Redis is reported here
    /// rather than on the first cache write.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Arc<Self>> {
        let client = redis::Client::open(redis_url).context("invalid redis url")?;
        let mut conn = ConnectionManager::new(client)
            .await
            .context("failed to connect to redis")?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis ping failed")?;
        Ok(Arc::new(Self { conn }))
    }
}

#[async_trait]
impl CacheRepository for RedisCacheRepository {
    async fn set_message_sent(
        &self,
        message_id: Uuid,
        external_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let info = MessageSentInfo {
            external_id: external_id.to_string(),
            sent_at,
        };
        let payload = serde_json::to_string(&info)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(sent_key(message_id), payload, SENT_INFO_TTL.as_secs())
            .await
            .context("failed to cache sent message info")?;
        Ok(())
    }

    async fn get_message_sent(&self, message_id: Uuid) -> anyhow::Result<Option<MessageSentInfo>> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(sent_key(message_id)).await?;
        payload
            .map(|json| serde_json::from_str(&json).context("failed to decode sent message info"))
            .transpose()
    }

    async fn set_scheduler_status(&self, status: SchedulerStatus) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(SCHEDULER_STATUS_KEY, status.as_str())
            .await
            .context("failed to cache scheduler status")?;
        Ok(())
    }

    async fn get_scheduler_status(&self) -> anyhow::Result<Option<SchedulerStatus>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(SCHEDULER_STATUS_KEY).await?;
        Ok(value.as_deref().and_then(SchedulerStatus::from_str))
    }
}
