use crate::{
    application::usecases::{list_sent_messages::SentMessagesPage, message_stats::MessageStats},
    domain::models::{Message, SchedulerInfo},
    presentation::http::responses::{
        MessageDto, MessageStatsDto, SchedulerStatusResponseDto, SentMessagesPageDto,
    },
};

pub fn map_message(message: &Message) -> MessageDto {
    MessageDto {
        id: message.id,
        content: message.content.clone(),
        phone_number: message.destination.clone(),
        status: message.status.into(),
        created_at: message.created_at.to_rfc3339(),
        updated_at: message.updated_at.to_rfc3339(),
        sent_at: message.sent_at.map(|at| at.to_rfc3339()),
        external_message_id: message.external_id.clone(),
        error_message: message.error.clone(),
    }
}

pub fn map_sent_page(page: &SentMessagesPage) -> SentMessagesPageDto {
    SentMessagesPageDto {
        messages: page.messages.iter().map(map_message).collect(),
        total_count: page.total_count,
        page: page.page as u32,
        limit: page.limit as u32,
        total_pages: page.total_pages,
    }
}

pub fn map_stats(stats: &MessageStats) -> MessageStatsDto {
    MessageStatsDto {
        total_messages: stats.total,
        pending_messages: stats.pending,
        sent_messages: stats.sent,
        failed_messages: stats.failed,
    }
}

pub fn map_scheduler_info(info: &SchedulerInfo) -> SchedulerStatusResponseDto {
    SchedulerStatusResponseDto {
        status: info.status.into(),
        last_run: info.last_tick.map(|at| at.to_rfc3339()),
        next_run: info.next_tick.map(|at| at.to_rfc3339()),
        messages_sent_count: info.messages_sent,
        interval_ms: u64::try_from(info.interval.as_millis()).unwrap_or(u64::MAX),
        batch_size: info.batch_size as u32,
    }
}
