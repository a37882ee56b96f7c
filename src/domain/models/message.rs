use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Upper bound on message content, counted in characters.
pub const MAX_CONTENT_LENGTH: usize = 160;

/// Upper bound on the destination address, matching the storage column.
pub const MAX_DESTINATION_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(MessageStatus::Pending),
            "sent" => Some(MessageStatus::Sent),
            "failed" => Some(MessageStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub destination: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

impl Message {
    /// Builds a new pending message. Call [`Message::validate`] before persisting it.
    pub fn new(content: impl Into<String>, destination: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            destination: destination.into(),
            status: MessageStatus::Pending,
            created_at: now,
            updated_at: now,
            sent_at: None,
            external_id: None,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if self.content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong);
        }
        if self.destination.is_empty() {
            return Err(DomainError::EmptyDestination);
        }
        if self.destination.chars().count() > MAX_DESTINATION_LENGTH {
            return Err(DomainError::DestinationTooLong);
        }
        Ok(())
    }

    pub fn mark_sent(&mut self, external_id: impl Into<String>) {
        let now = next_timestamp(self.updated_at);
        self.status = MessageStatus::Sent;
        self.sent_at = Some(now);
        self.updated_at = now;
        self.external_id = Some(external_id.into());
    }

    /// Leaves `sent_at` and `external_id` untouched.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = MessageStatus::Failed;
        self.updated_at = next_timestamp(self.updated_at);
        self.error = Some(reason.into());
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    pub fn is_sent(&self) -> bool {
        self.status == MessageStatus::Sent
    }
}

// Keeps updated_at strictly increasing even when the clock has not ticked
// since the previous write.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}
