use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Acknowledgement status the delivery API uses for an accepted message.
pub const STATUS_SENT: &str = "sent";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryResponse {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResponse {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            status: STATUS_SENT.to_string(),
            message: None,
            error: None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == STATUS_SENT
    }

    /// Reason to record when the acknowledgement is not a successful send.
    pub fn failure_reason(&self) -> String {
        self.error
            .as_deref()
            .filter(|reason| !reason.is_empty())
            .unwrap_or("unknown error from delivery API")
            .to_string()
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Transport(String),
    #[error("delivery API rejected message with status {status}: {reason}")]
    Rejected { status: u16, reason: String },
}

#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send(&self, destination: &str, content: &str)
    -> Result<DeliveryResponse, DeliveryError>;
}
