use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{ApiResponse, OpenApi, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    mappers::map_sweep_report,
    responses::{SweepErrorDto, SweepResponseDto},
    security::ServiceKeyAuth,
};

#[derive(ApiResponse)]
pub enum ProcessScheduledMessagesResponse {
    /// Sweep completed, possibly with per-row errors.
    #[oai(status = 200)]
    Ok(Json<SweepResponseDto>),
    /// The sweep could not run at all.
    #[oai(status = 500)]
    Failed(Json<SweepErrorDto>),
}

/// The server-autonomous sweep path: invoked by an external timer with no
/// client present, guarded by the static service key.
#[derive(Clone)]
pub struct BatchEndpoints {
    state: Arc<ApiState>,
}

impl BatchEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl BatchEndpoints {
    #[oai(
        path = "/process-scheduled-messages",
        method = "post",
        tag = EndpointsTags::Batch,
    )]
    pub async fn process_scheduled_messages(
        &self,
        auth: ServiceKeyAuth,
    ) -> PoemResult<ProcessScheduledMessagesResponse> {
        auth.verify(&self.state.batch_service_key)?;

        match self.state.scheduler.process_due_messages().await {
            Ok(report) => Ok(ProcessScheduledMessagesResponse::Ok(Json(map_sweep_report(
                report,
            )))),
            Err(err) => Ok(ProcessScheduledMessagesResponse::Failed(Json(
                SweepErrorDto {
                    success: false,
                    error: err.to_string(),
                },
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use poem::{http::StatusCode, test::TestClient};
    use uuid::Uuid;

    use super::*;
    use crate::{
        application::{
            services::{
                activation::ActivationMilestoneNotifier, chat::ChatDelivery, clock::SystemClock,
                scheduler::MessageScheduler,
            },
            usecases::run_sweep::RunSweepUseCase,
        },
        domain::{
            models::{MessageKind, NewScheduledMessage, ScheduledMessage, SchedulingStats},
            repositories::ScheduleRepository,
        },
        infrastructure::repositories::in_memory::{
            InMemoryAdminDirectory, InMemoryMilestoneMarkRepository, InMemoryScheduleRepository,
        },
        presentation::http::build_app,
    };

    const SERVICE_KEY: &str = "test-service-key";

    struct NoopChat;

    #[async_trait]
    impl ChatDelivery for NoopChat {
        async fn resolve_or_create_channel(
            &self,
            _initiator_id: Uuid,
            _recipient_id: Uuid,
        ) -> anyhow::Result<Uuid> {
            Ok(Uuid::new_v4())
        }

        async fn resolve_membership(
            &self,
            _user_id: Uuid,
            _channel_id: Uuid,
        ) -> anyhow::Result<Uuid> {
            Ok(Uuid::new_v4())
        }

        async fn append_message(
            &self,
            _channel_id: Uuid,
            _sender_membership_id: Uuid,
            _body: &str,
            _kind: MessageKind,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct UnreachableStore;

    #[async_trait]
    impl ScheduleRepository for UnreachableStore {
        async fn find_active_for_user(
            &self,
            _user_id: Uuid,
        ) -> anyhow::Result<Option<ScheduledMessage>> {
            anyhow::bail!("store unreachable")
        }

        async fn insert(
            &self,
            _schedule: NewScheduledMessage,
        ) -> anyhow::Result<ScheduledMessage> {
            anyhow::bail!("store unreachable")
        }

        async fn record_delivery(
            &self,
            _id: Uuid,
            _message_count: u32,
            _last_sent_at: DateTime<Utc>,
            _next_scheduled_at: DateTime<Utc>,
        ) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }

        async fn deactivate_for_user(&self, _user_id: Uuid) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }

        async fn update_content_for_user(
            &self,
            _user_id: Uuid,
            _content: &str,
        ) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }

        async fn list_due(&self, _now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledMessage>> {
            anyhow::bail!("store unreachable")
        }

        async fn list_active(&self) -> anyhow::Result<Vec<ScheduledMessage>> {
            anyhow::bail!("store unreachable")
        }

        async fn stats(
            &self,
            _day_start: DateTime<Utc>,
            _day_end: DateTime<Utc>,
        ) -> anyhow::Result<SchedulingStats> {
            anyhow::bail!("store unreachable")
        }
    }

    fn state_with(repo: Arc<dyn ScheduleRepository>) -> Arc<ApiState> {
        let clock = Arc::new(SystemClock);
        let chat = Arc::new(NoopChat);
        let scheduler = Arc::new(MessageScheduler::new(repo, chat.clone(), clock.clone()));
        let sweep_usecase = Arc::new(RunSweepUseCase::new(scheduler.clone(), None));
        let milestone_notifier = Arc::new(ActivationMilestoneNotifier::new(
            chat,
            Arc::new(InMemoryAdminDirectory::new()),
            Arc::new(InMemoryMilestoneMarkRepository::new()),
            clock,
        ));
        Arc::new(ApiState {
            scheduler,
            sweep_usecase,
            milestone_notifier,
            batch_service_key: SERVICE_KEY.to_string(),
        })
    }

    #[tokio::test]
    async fn responds_with_sweep_report() {
        let app = build_app(
            state_with(Arc::new(InMemoryScheduleRepository::new())),
            "http://localhost:3000",
        );
        let cli = TestClient::new(app);

        let resp = cli
            .post("/api/process-scheduled-messages")
            .header("Authorization", format!("Bearer {SERVICE_KEY}"))
            .send()
            .await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        let body = json.value().object();
        body.get("success").assert_bool(true);
        body.get("processed").assert_i64(0);
        body.get("total").assert_i64(0);
    }

    #[tokio::test]
    async fn rejects_invalid_service_key() {
        let app = build_app(
            state_with(Arc::new(InMemoryScheduleRepository::new())),
            "http://localhost:3000",
        );
        let cli = TestClient::new(app);

        let resp = cli
            .post("/api/process-scheduled-messages")
            .header("Authorization", "Bearer wrong-key")
            .send()
            .await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reports_store_failure_as_500() {
        let app = build_app(state_with(Arc::new(UnreachableStore)), "http://localhost:3000");
        let cli = TestClient::new(app);

        let resp = cli
            .post("/api/process-scheduled-messages")
            .header("Authorization", format!("Bearer {SERVICE_KEY}"))
            .send()
            .await;

        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json = resp.json().await;
        let body = json.value().object();
        body.get("success").assert_bool(false);
        assert!(body.get("error").string().contains("store unreachable"));
    }
}
