use poem_openapi::Object;
use uuid::Uuid;

#[derive(Object)]
pub struct CreateScheduleResponseDto {
    pub schedule_id: Uuid,
}

#[derive(Object)]
pub struct ScheduledMessageDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub admin_id: Uuid,
    pub message_content: String,
    pub schedule_start_date: String,
    pub message_count: u32,
    pub last_sent_at: Option<String>,
    pub next_scheduled_at: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct SchedulingStatsDto {
    pub total: u64,
    pub active: u64,
    pub messages_sent_today: u64,
    pub upcoming_today: u64,
}

#[derive(Object)]
pub struct SweepResponseDto {
    pub success: bool,
    pub processed: u32,
    pub total: u32,
    /// Per-row failure descriptions; omitted when the sweep was clean.
    pub errors: Option<Vec<String>>,
}

#[derive(Object)]
pub struct SweepErrorDto {
    pub success: bool,
    pub error: String,
}
