use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    application::handlers::message_dispatcher::MessageDispatchHandler,
    domain::repositories::MessageRepository,
};

/// Drains up to `batch_size` pending messages and returns how many were sent.
///
/// Fails only when the pending messages cannot be fetched. Per-message
/// delivery failures are recorded on the message and do not fail the batch.
#[async_trait]
pub trait PendingMessageProcessor: Send + Sync {
    async fn process_pending(&self, batch_size: usize) -> anyhow::Result<usize>;
}

pub struct ProcessPendingMessagesUseCase {
    message_repo: Arc<dyn MessageRepository>,
    dispatcher: Arc<MessageDispatchHandler>,
}

impl ProcessPendingMessagesUseCase {
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        dispatcher: Arc<MessageDispatchHandler>,
    ) -> Self {
        Self {
            message_repo,
            dispatcher,
        }
    }

    pub async fn execute(&self, batch_size: usize) -> anyhow::Result<usize> {
        info!(batch_size, "processing pending messages");

        let messages = self.message_repo.get_pending(batch_size).await?;
        if messages.is_empty() {
            debug!("no pending messages to process");
            return Ok(0);
        }

        let total = messages.len();
        let mut sent = 0;
        // Sequential on purpose: bounds load on the delivery API and keeps
        // creation-time ordering within the batch.
        for mut message in messages {
            if self.dispatcher.handle(&mut message).await.is_sent() {
                sent += 1;
            }
        }

        info!(
            total_messages = total,
            successful_sends = sent,
            failed_sends = total - sent,
            "batch processing completed"
        );

        Ok(sent)
    }
}

#[async_trait]
impl PendingMessageProcessor for ProcessPendingMessagesUseCase {
    async fn process_pending(&self, batch_size: usize) -> anyhow::Result<usize> {
        self.execute(batch_size).await
    }
}
