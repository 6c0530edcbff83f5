use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Path, payload::Json};
use uuid::Uuid;

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    requests::MilestoneCheckRequestDto,
};

#[derive(Clone)]
pub struct UsersEndpoints {
    state: Arc<ApiState>,
}

impl UsersEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl UsersEndpoints {
    /// Invoked on session establishment. Best-effort: milestone delivery
    /// failures are absorbed so login never blocks on it.
    #[oai(
        path = "/users/:user_id/milestone-check",
        method = "post",
        tag = EndpointsTags::Users,
    )]
    pub async fn milestone_check(
        &self,
        user_id: Path<Uuid>,
        request: Json<MilestoneCheckRequestDto>,
    ) -> PoemResult<()> {
        self.state
            .milestone_notifier
            .check_and_send(user_id.0, request.activation_date)
            .await;

        Ok(())
    }
}
