use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{models::Message, repositories::MessageRepository};

pub struct GetMessageUseCase {
    message_repo: Arc<dyn MessageRepository>,
}

impl GetMessageUseCase {
    pub fn new(message_repo: Arc<dyn MessageRepository>) -> Self {
        Self { message_repo }
    }

    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Message> {
        self.message_repo.get_by_id(id).await
    }
}
