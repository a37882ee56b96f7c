use std::sync::Arc;

use tracing::info;

use crate::domain::{models::Message, repositories::MessageRepository};

pub struct CreateMessageRequest {
    pub content: String,
    pub destination: String,
}

pub struct CreateMessageUseCase {
    message_repo: Arc<dyn MessageRepository>,
}

impl CreateMessageUseCase {
    pub fn new(message_repo: Arc<dyn MessageRepository>) -> Self {
        Self { message_repo }
    }

    pub async fn execute(&self, request: CreateMessageRequest) -> anyhow::Result<Message> {
        let message = Message::new(request.content, request.destination);
        message.validate()?;

        self.message_repo.create(&message).await?;

        info!(message_id = %message.id, "message created");
        Ok(message)
    }
}
