use std::sync::Arc;

use poem::{Result as PoemResult, http::StatusCode};
use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};
use uuid::Uuid;

use crate::{
    application::{
        handlers::message_dispatcher::DispatchOutcome,
        usecases::{
            create_message::CreateMessageRequest, list_sent_messages::ListSentMessagesRequest,
        },
    },
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::map_error,
        mappers::{map_message, map_sent_page, map_stats},
        requests::CreateMessageRequestDto,
        responses::{
            CreateMessageResponse, MessageDto, MessageStatsDto, ProcessBatchResponseDto,
            SentMessagesPageDto,
        },
    },
};

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    #[oai(
        path = "/messages",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn create_message(
        &self,
        request: Json<CreateMessageRequestDto>,
    ) -> PoemResult<CreateMessageResponse> {
        let request = request.0;
        let message = self
            .state
            .create_message_usecase
            .execute(CreateMessageRequest {
                content: request.content,
                destination: request.phone_number,
            })
            .await
            .map_err(map_error)?;

        Ok(CreateMessageResponse::Created(Json(map_message(&message))))
    }

    #[oai(
        path = "/messages/sent",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn list_sent_messages(
        &self,
        #[oai(validator(minimum(value = "1")))] page: Query<Option<u32>>,
        #[oai(validator(minimum(value = "1"), maximum(value = "100")))] limit: Query<Option<u32>>,
    ) -> PoemResult<Json<SentMessagesPageDto>> {
        let defaults = ListSentMessagesRequest::default();
        let result = self
            .state
            .list_sent_messages_usecase
            .execute(ListSentMessagesRequest {
                page: page.0.map_or(defaults.page, |page| page as usize),
                limit: limit.0.map_or(defaults.limit, |limit| limit as usize),
            })
            .await
            .map_err(map_error)?;

        Ok(Json(map_sent_page(&result)))
    }

    #[oai(
        path = "/messages/stats",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn message_stats(&self) -> PoemResult<Json<MessageStatsDto>> {
        let stats = self
            .state
            .message_stats_usecase
            .execute()
            .await
            .map_err(map_error)?;

        Ok(Json(map_stats(&stats)))
    }

    #[oai(
        path = "/messages/actions/process",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn process_pending(
        &self,
        #[oai(validator(minimum(value = "1")))] batch_size: Query<Option<u32>>,
    ) -> PoemResult<Json<ProcessBatchResponseDto>> {
        let batch_size = batch_size
            .0
            .map_or(self.state.scheduler.config().batch_size, |size| size as usize);

        let sent = self
            .state
            .process_pending_usecase
            .execute(batch_size)
            .await
            .map_err(map_error)?;

        Ok(Json(ProcessBatchResponseDto {
            batch_size: batch_size as u32,
            messages_sent: sent as u32,
        }))
    }

    #[oai(
        path = "/messages/:message_id",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn get_message(&self, message_id: Path<Uuid>) -> PoemResult<Json<MessageDto>> {
        let message = self
            .state
            .get_message_usecase
            .execute(message_id.0)
            .await
            .map_err(map_error)?;

        Ok(Json(map_message(&message)))
    }

    #[oai(
        path = "/messages/:message_id/send",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn send_message(&self, message_id: Path<Uuid>) -> PoemResult<Json<MessageDto>> {
        let (message, outcome) = self
            .state
            .send_message_usecase
            .execute(message_id.0)
            .await
            .map_err(map_error)?;

        match outcome {
            DispatchOutcome::Sent { .. } => Ok(Json(map_message(&message))),
            DispatchOutcome::Failed { reason } => Err(poem::Error::from_string(
                format!("message delivery failed: {reason}"),
                StatusCode::BAD_GATEWAY,
            )),
        }
    }
}
