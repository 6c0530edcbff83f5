use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{NewScheduledMessage, ScheduledMessage, SchedulingStats};

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMessage>>;

    async fn insert(&self, schedule: NewScheduledMessage) -> anyhow::Result<ScheduledMessage>;

    /// Advances a row after a successful send: bumps the count and moves the
    /// due timestamp forward.
    async fn record_delivery(
        &self,
        id: Uuid,
        message_count: u32,
        last_sent_at: DateTime<Utc>,
        next_scheduled_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn deactivate_for_user(&self, user_id: Uuid) -> anyhow::Result<()>;

    async fn update_content_for_user(&self, user_id: Uuid, content: &str) -> anyhow::Result<()>;

    /// Active rows with `next_scheduled_at <= now`, ascending by due time.
    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledMessage>>;

    async fn list_active(&self) -> anyhow::Result<Vec<ScheduledMessage>>;

    /// Count aggregations for the admin dashboard. `day_start` is inclusive,
    /// `day_end` exclusive.
    async fn stats(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> anyhow::Result<SchedulingStats>;
}

#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Resolves the sender identity for system-originated messages.
    async fn first_admin(&self) -> anyhow::Result<Option<Uuid>>;
}

/// Per-day idempotency marks for milestone sends. Ephemeral; losing a mark
/// at worst repeats one send within the same day.
#[async_trait]
pub trait MilestoneMarkRepository: Send + Sync {
    async fn last_sent(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn record_sent(&self, key: &str, day: &str) -> anyhow::Result<()>;
}
