use poem_openapi::{ApiResponse, Object, payload::Json};
use uuid::Uuid;

use crate::presentation::models::{MessageStatusDto, SchedulerStatusDto};

#[derive(Object)]
pub struct MessageDto {
    pub id: Uuid,
    pub content: String,
    pub phone_number: String,
    pub status: MessageStatusDto,
    pub created_at: String,
    pub updated_at: String,
    pub sent_at: Option<String>,
    pub external_message_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(ApiResponse)]
pub enum CreateMessageResponse {
    #[oai(status = 201)]
    Created(Json<MessageDto>),
}

#[derive(Object)]
pub struct SentMessagesPageDto {
    pub messages: Vec<MessageDto>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Object)]
pub struct MessageStatsDto {
    pub total_messages: u64,
    pub pending_messages: u64,
    pub sent_messages: u64,
    pub failed_messages: u64,
}

#[derive(Object)]
pub struct ProcessBatchResponseDto {
    pub batch_size: u32,
    pub messages_sent: u32,
}

#[derive(Object)]
pub struct SchedulerStatusResponseDto {
    pub status: SchedulerStatusDto,
    pub last_run: Option<String>,
    pub next_run: Option<String>,
    pub messages_sent_count: u64,
    pub interval_ms: u64,
    pub batch_size: u32,
}

#[derive(Object)]
pub struct SchedulerActionResponseDto {
    pub message: String,
    pub status: SchedulerStatusDto,
}
