use poem_openapi::Enum;

use crate::domain::models::{MessageStatus, SchedulerStatus};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum MessageStatusDto {
    #[oai(rename = "pending")]
    Pending,
    #[oai(rename = "sent")]
    Sent,
    #[oai(rename = "failed")]
    Failed,
}

impl From<MessageStatus> for MessageStatusDto {
    fn from(value: MessageStatus) -> Self {
        match value {
            MessageStatus::Pending => MessageStatusDto::Pending,
            MessageStatus::Sent => MessageStatusDto::Sent,
            MessageStatus::Failed => MessageStatusDto::Failed,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SchedulerStatusDto {
    #[oai(rename = "stopped")]
    Stopped,
    #[oai(rename = "running")]
    Running,
}

impl From<SchedulerStatus> for SchedulerStatusDto {
    fn from(value: SchedulerStatus) -> Self {
        match value {
            SchedulerStatus::Stopped => SchedulerStatusDto::Stopped,
            SchedulerStatus::Running => SchedulerStatusDto::Running,
        }
    }
}
