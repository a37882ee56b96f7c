use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::services::delivery::DeliveryClient,
    domain::{
        models::Message,
        repositories::{CacheRepository, MessageRepository},
    },
};

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { external_id: String },
    Failed { reason: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

/// Drives one message through a send attempt and records the outcome.
pub struct MessageDispatchHandler {
    message_repo: Arc<dyn MessageRepository>,
    delivery: Arc<dyn DeliveryClient>,
    cache: Option<Arc<dyn CacheRepository>>,
}

impl MessageDispatchHandler {
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        delivery: Arc<dyn DeliveryClient>,
        cache: Option<Arc<dyn CacheRepository>>,
    ) -> Self {
        Self {
            message_repo,
            delivery,
            cache,
        }
    }

    /// Attempts delivery of `message` exactly once.
    ///
    /// Never fails: delivery errors become a `failed` message, and errors
    /// persisting the outcome or writing the cache are only logged.
    pub async fn handle(&self, message: &mut Message) -> DispatchOutcome {
        info!(
            message_id = %message.id,
            destination = %message.destination,
            "sending message"
        );

        let outcome = match self
            .delivery
            .send(&message.destination, &message.content)
            .await
        {
            Ok(response) if response.is_sent() => DispatchOutcome::Sent {
                external_id: response.message_id,
            },
            Ok(response) => DispatchOutcome::Failed {
                reason: response.failure_reason(),
            },
            Err(err) => DispatchOutcome::Failed {
                reason: err.to_string(),
            },
        };

        match &outcome {
            DispatchOutcome::Sent { external_id } => {
                message.mark_sent(external_id.clone());
                if let Err(err) = self.message_repo.update(message).await {
                    error!(
                        message_id = %message.id,
                        error = %err,
                        "failed to persist sent status, delivery already happened"
                    );
                }
                self.cache_sent(message, external_id).await;
                info!(
                    message_id = %message.id,
                    external_id = %external_id,
                    "message sent"
                );
            }
            DispatchOutcome::Failed { reason } => {
                message.mark_failed(reason.clone());
                if let Err(err) = self.message_repo.update(message).await {
                    error!(
                        message_id = %message.id,
                        error = %err,
                        "failed to persist failed status"
                    );
                }
                error!(message_id = %message.id, reason = %reason, "message delivery failed");
            }
        }

        outcome
    }

    async fn cache_sent(&self, message: &Message, external_id: &str) {
        let (Some(cache), Some(sent_at)) = (&self.cache, message.sent_at) else {
            return;
        };
        if let Err(err) = cache.set_message_sent(message.id, external_id, sent_at).await {
            warn!(message_id = %message.id, error = %err, "failed to cache sent message info");
        }
    }
}
