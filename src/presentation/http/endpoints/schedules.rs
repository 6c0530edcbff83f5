use std::sync::Arc;

use poem::{Result as PoemResult, http::StatusCode};
use poem_openapi::{OpenApi, param::Path, payload::Json};
use uuid::Uuid;

use crate::{
    domain::errors::SchedulerError,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        mappers::{map_schedule, map_stats, map_sweep_outcome},
        requests::{CreateScheduleRequestDto, UpdateContentRequestDto},
        responses::{
            CreateScheduleResponseDto, ScheduledMessageDto, SchedulingStatsDto, SweepResponseDto,
        },
    },
};

#[derive(Clone)]
pub struct SchedulesEndpoints {
    state: Arc<ApiState>,
}

impl SchedulesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SchedulesEndpoints {
    /// Creates a reminder series and sends the first message immediately.
    #[oai(
        path = "/schedules",
        method = "post",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn create_schedule(
        &self,
        request: Json<CreateScheduleRequestDto>,
    ) -> PoemResult<Json<CreateScheduleResponseDto>> {
        let schedule_id = self
            .state
            .scheduler
            .create_scheduled_message(request.user_id, request.admin_id, request.message.clone())
            .await
            .map_err(map_scheduler_error)?;

        Ok(Json(CreateScheduleResponseDto { schedule_id }))
    }

    #[oai(
        path = "/schedules",
        method = "get",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn list_schedules(&self) -> PoemResult<Json<Vec<ScheduledMessageDto>>> {
        let schedules = self
            .state
            .scheduler
            .list_active_schedules()
            .await
            .map_err(map_scheduler_error)?;

        Ok(Json(schedules.iter().map(map_schedule).collect()))
    }

    #[oai(
        path = "/schedules/stats",
        method = "get",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn scheduling_stats(&self) -> PoemResult<Json<SchedulingStatsDto>> {
        let stats = self
            .state
            .scheduler
            .get_scheduling_stats()
            .await
            .map_err(map_scheduler_error)?;

        Ok(Json(map_stats(stats)))
    }

    #[oai(
        path = "/schedules/:user_id",
        method = "get",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn get_schedule(
        &self,
        user_id: Path<Uuid>,
    ) -> PoemResult<Json<ScheduledMessageDto>> {
        let schedule = self
            .state
            .scheduler
            .get_active_schedule_for_user(user_id.0)
            .await
            .map_err(map_scheduler_error)?
            .ok_or_else(|| {
                poem::Error::from_string("no active schedule for user", StatusCode::NOT_FOUND)
            })?;

        Ok(Json(map_schedule(&schedule)))
    }

    #[oai(
        path = "/schedules/:user_id/actions/deactivate",
        method = "post",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn deactivate_schedule(&self, user_id: Path<Uuid>) -> PoemResult<()> {
        self.state
            .scheduler
            .deactivate_scheduled_message(user_id.0)
            .await
            .map_err(map_scheduler_error)?;

        Ok(())
    }

    #[oai(
        path = "/schedules/:user_id/content",
        method = "put",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn update_content(
        &self,
        user_id: Path<Uuid>,
        request: Json<UpdateContentRequestDto>,
    ) -> PoemResult<()> {
        self.state
            .scheduler
            .update_message_content(user_id.0, request.message.clone())
            .await
            .map_err(map_scheduler_error)?;

        Ok(())
    }

    /// Manual sweep trigger for the admin dashboard. Uses the remote batch
    /// endpoint when one is configured, otherwise runs in process.
    #[oai(
        path = "/schedules/actions/process",
        method = "post",
        tag = EndpointsTags::Schedules,
    )]
    pub async fn process_due(&self) -> PoemResult<Json<SweepResponseDto>> {
        let outcome = self.state.sweep_usecase.execute().await;
        Ok(Json(map_sweep_outcome(outcome)))
    }
}

fn map_scheduler_error(err: SchedulerError) -> poem::Error {
    let status = match &err {
        SchedulerError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    poem::Error::from_string(err.to_string(), status)
}
