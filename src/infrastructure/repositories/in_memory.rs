use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Message, MessageStatus},
    repositories::MessageRepository,
};

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> anyhow::Result<()> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(&message.id) {
            anyhow::bail!("message {} already exists", message.id);
        }
        messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Message> {
        let messages = self.messages.read().await;
        messages
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::MessageNotFound(id).into())
    }

    async fn get_pending(&self, limit: usize) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut pending: Vec<Message> = messages.values().filter(|m| m.is_pending()).cloned().collect();
        pending.sort_by_key(|m| m.created_at);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn get_sent(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut sent: Vec<Message> = messages.values().filter(|m| m.is_sent()).cloned().collect();
        sent.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(sent.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_all(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut all: Vec<Message> = messages.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, message: &Message) -> anyhow::Result<()> {
        let mut messages = self.messages.write().await;
        match messages.get_mut(&message.id) {
            Some(entry) => {
                *entry = message.clone();
                Ok(())
            }
            None => Err(DomainError::MessageNotFound(message.id).into()),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut messages = self.messages.write().await;
        messages
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::MessageNotFound(id).into())
    }

    async fn count_by_status(&self, status: MessageStatus) -> anyhow::Result<u64> {
        let messages = self.messages.read().await;
        Ok(messages.values().filter(|m| m.status == status).count() as u64)
    }
}
