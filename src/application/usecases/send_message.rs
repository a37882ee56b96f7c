use std::sync::Arc;

use uuid::Uuid;

use crate::{
    application::handlers::message_dispatcher::{DispatchOutcome, MessageDispatchHandler},
    domain::{errors::DomainError, models::Message, repositories::MessageRepository},
};

/// Sends a single pending message on demand, outside the scheduled cadence.
pub struct SendMessageUseCase {
    message_repo: Arc<dyn MessageRepository>,
    dispatcher: Arc<MessageDispatchHandler>,
}

impl SendMessageUseCase {
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        dispatcher: Arc<MessageDispatchHandler>,
    ) -> Self {
        Self {
            message_repo,
            dispatcher,
        }
    }

    pub async fn execute(&self, id: Uuid) -> anyhow::Result<(Message, DispatchOutcome)> {
        let mut message = self.message_repo.get_by_id(id).await?;
        if !message.is_pending() {
            return Err(DomainError::MessageNotPending(id).into());
        }

        let outcome = self.dispatcher.handle(&mut message).await;
        Ok((message, outcome))
    }
}
