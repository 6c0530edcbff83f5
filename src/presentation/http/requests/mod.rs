use chrono::{DateTime, Utc};
use poem_openapi::Object;
use uuid::Uuid;

#[derive(Object, Debug)]
pub struct CreateScheduleRequestDto {
    pub user_id: Uuid,
    pub admin_id: Uuid,
    /// Custom reminder body; the default appointment reminder is used when
    /// absent.
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub message: Option<String>,
}

#[derive(Object, Debug)]
pub struct UpdateContentRequestDto {
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub message: String,
}

#[derive(Object, Debug)]
pub struct MilestoneCheckRequestDto {
    /// Account-activation timestamp; absent for never-activated users.
    pub activation_date: Option<DateTime<Utc>>,
}
