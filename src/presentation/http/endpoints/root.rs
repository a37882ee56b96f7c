use std::sync::Arc;

use poem_openapi::Tags;

use crate::{
    application::{
        services::scheduler::MessageScheduler,
        usecases::{
            create_message::CreateMessageUseCase, get_message::GetMessageUseCase,
            list_sent_messages::ListSentMessagesUseCase, message_stats::MessageStatsUseCase,
            process_pending::ProcessPendingMessagesUseCase, send_message::SendMessageUseCase,
        },
    },
    presentation::http::endpoints::{
        health::HealthEndpoints, messages::MessagesEndpoints, scheduler::SchedulerEndpoints,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub create_message_usecase: Arc<CreateMessageUseCase>,
    pub get_message_usecase: Arc<GetMessageUseCase>,
    pub list_sent_messages_usecase: Arc<ListSentMessagesUseCase>,
    pub message_stats_usecase: Arc<MessageStatsUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub process_pending_usecase: Arc<ProcessPendingMessagesUseCase>,
    pub scheduler: Arc<MessageScheduler>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Messages,
    Scheduler,
}

pub type Endpoints = (HealthEndpoints, MessagesEndpoints, SchedulerEndpoints);

pub fn endpoints(state: Arc<ApiState>) -> Endpoints {
    (
        HealthEndpoints,
        MessagesEndpoints::new(state.clone()),
        SchedulerEndpoints::new(state),
    )
}
