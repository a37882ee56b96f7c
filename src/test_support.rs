use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    application::services::delivery::{DeliveryClient, DeliveryError, DeliveryResponse},
    domain::{
        models::{Message, MessageStatus, SchedulerStatus},
        repositories::{CacheRepository, MessageRepository, MessageSentInfo},
    },
    infrastructure::repositories::in_memory::InMemoryMessageRepository,
};

/// Delivery client that replays scripted results, then acknowledges everything.
pub struct ScriptedDelivery {
    script: Mutex<VecDeque<Result<DeliveryResponse, DeliveryError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedDelivery {
    pub fn new(script: Vec<Result<DeliveryResponse, DeliveryError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always_ok() -> Self {
        Self::new(Vec::new())
    }

    /// `(destination, content)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryClient for ScriptedDelivery {
    async fn send(
        &self,
        destination: &str,
        content: &str,
    ) -> Result<DeliveryResponse, DeliveryError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((destination.to_string(), content.to_string()));
            calls.len()
        };
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DeliveryResponse::sent(format!("ext_{call}"))))
    }
}

pub struct FailingCache;

#[async_trait]
impl CacheRepository for FailingCache {
    async fn set_message_sent(
        &self,
        _message_id: Uuid,
        _external_id: &str,
        _sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("cache unavailable")
    }

    async fn get_message_sent(&self, _message_id: Uuid) -> anyhow::Result<Option<MessageSentInfo>> {
        anyhow::bail!("cache unavailable")
    }

    async fn set_scheduler_status(&self, _status: SchedulerStatus) -> anyhow::Result<()> {
        anyhow::bail!("cache unavailable")
    }

    async fn get_scheduler_status(&self) -> anyhow::Result<Option<SchedulerStatus>> {
        anyhow::bail!("cache unavailable")
    }
}

/// In-memory store with selectable failing operations.
#[derive(Default)]
pub struct FlakyRepository {
    inner: InMemoryMessageRepository,
    fail_updates: bool,
    fail_fetch: bool,
}

impl FlakyRepository {
    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MessageRepository for FlakyRepository {
    async fn create(&self, message: &Message) -> anyhow::Result<()> {
        self.inner.create(message).await
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Message> {
        self.inner.get_by_id(id).await
    }

    async fn get_pending(&self, limit: usize) -> anyhow::Result<Vec<Message>> {
        if self.fail_fetch {
            anyhow::bail!("database connection lost");
        }
        self.inner.get_pending(limit).await
    }

    async fn get_sent(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>> {
        self.inner.get_sent(offset, limit).await
    }

    async fn get_all(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>> {
        self.inner.get_all(offset, limit).await
    }

    async fn update(&self, message: &Message) -> anyhow::Result<()> {
        if self.fail_updates {
            anyhow::bail!("database connection lost");
        }
        self.inner.update(message).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.inner.delete(id).await
    }

    async fn count_by_status(&self, status: MessageStatus) -> anyhow::Result<u64> {
        self.inner.count_by_status(status).await
    }
}
