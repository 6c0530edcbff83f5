use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reminder body used when the admin supplies no custom message.
pub const DEFAULT_REMINDER: &str = "You have an appointment tomorrow";

/// One reminder series for one user. At most one row per user may have
/// `is_active = true`; rows are soft-deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub admin_id: Uuid,
    pub message_content: String,
    pub schedule_start_date: DateTime<Utc>,
    pub message_count: u32,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub next_scheduled_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScheduledMessage {
    pub user_id: Uuid,
    pub admin_id: Uuid,
    pub message_content: String,
    pub schedule_start_date: DateTime<Utc>,
    pub next_scheduled_at: DateTime<Utc>,
}

/// Result of one sweep over due rows. `processed` counts only successful
/// deliveries; failed rows stay due and are retried on the next sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub processed: u32,
    pub total: u32,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SchedulingStats {
    pub total: u64,
    pub active: u64,
    pub messages_sent_today: u64,
    pub upcoming_today: u64,
}
