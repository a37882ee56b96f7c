use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{MAX_CONTENT_LENGTH, MAX_DESTINATION_LENGTH};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("message content cannot be empty")]
    EmptyContent,
    #[error("message content exceeds {} characters", MAX_CONTENT_LENGTH)]
    ContentTooLong,
    #[error("destination cannot be empty")]
    EmptyDestination,
    #[error("destination exceeds {} characters", MAX_DESTINATION_LENGTH)]
    DestinationTooLong,
    #[error("invalid pagination: page must be at least 1 and limit between 1 and {0}")]
    InvalidPagination(usize),
    #[error("message not found: {0}")]
    MessageNotFound(Uuid),
    #[error("message is not in pending status: {0}")]
    MessageNotPending(Uuid),
    #[error("scheduler is already running")]
    SchedulerAlreadyRunning,
    #[error("scheduler is not running")]
    SchedulerNotRunning,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DomainError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyContent
                | DomainError::ContentTooLong
                | DomainError::EmptyDestination
                | DomainError::DestinationTooLong
        )
    }
}
