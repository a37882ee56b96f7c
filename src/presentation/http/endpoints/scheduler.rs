use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    domain::models::SchedulerStatus,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::map_domain_error,
        mappers::map_scheduler_info,
        responses::{SchedulerActionResponseDto, SchedulerStatusResponseDto},
    },
};

#[derive(Clone)]
pub struct SchedulerEndpoints {
    state: Arc<ApiState>,
}

impl SchedulerEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SchedulerEndpoints {
    #[oai(
        path = "/scheduler/start",
        method = "post",
        tag = EndpointsTags::Scheduler,
    )]
    pub async fn start(&self) -> PoemResult<Json<SchedulerActionResponseDto>> {
        self.state
            .scheduler
            .start()
            .await
            .map_err(|err| map_domain_error(&err))?;

        Ok(Json(SchedulerActionResponseDto {
            message: "Scheduler started successfully".to_string(),
            status: SchedulerStatus::Running.into(),
        }))
    }

    #[oai(
        path = "/scheduler/stop",
        method = "post",
        tag = EndpointsTags::Scheduler,
    )]
    pub async fn stop(&self) -> PoemResult<Json<SchedulerActionResponseDto>> {
        self.state
            .scheduler
            .stop()
            .await
            .map_err(|err| map_domain_error(&err))?;

        Ok(Json(SchedulerActionResponseDto {
            message: "Scheduler stopped successfully".to_string(),
            status: SchedulerStatus::Stopped.into(),
        }))
    }

    #[oai(
        path = "/scheduler/status",
        method = "get",
        tag = EndpointsTags::Scheduler,
    )]
    pub async fn status(&self) -> Json<SchedulerStatusResponseDto> {
        let info = self.state.scheduler.status().await;
        Json(map_scheduler_info(&info))
    }
}
