use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{NewScheduledMessage, ScheduledMessage, SchedulingStats},
    repositories::{AdminDirectory, MilestoneMarkRepository, ScheduleRepository},
};

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    schedules: Arc<RwLock<HashMap<Uuid, ScheduledMessage>>>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMessage>> {
        let schedules = self.schedules.read().await;
        Ok(schedules
            .values()
            .find(|s| s.user_id == user_id && s.is_active)
            .cloned())
    }

    async fn insert(&self, schedule: NewScheduledMessage) -> anyhow::Result<ScheduledMessage> {
        let now = Utc::now();
        let row = ScheduledMessage {
            id: Uuid::new_v4(),
            user_id: schedule.user_id,
            admin_id: schedule.admin_id,
            message_content: schedule.message_content,
            schedule_start_date: schedule.schedule_start_date,
            message_count: 0,
            last_sent_at: None,
            next_scheduled_at: schedule.next_scheduled_at,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let mut schedules = self.schedules.write().await;
        schedules.insert(row.id, row.clone());
        Ok(row)
    }

    async fn record_delivery(
        &self,
        id: Uuid,
        message_count: u32,
        last_sent_at: DateTime<Utc>,
        next_scheduled_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut schedules = self.schedules.write().await;
        if let Some(row) = schedules.get_mut(&id) {
            row.message_count = message_count;
            row.last_sent_at = Some(last_sent_at);
            row.next_scheduled_at = next_scheduled_at;
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn deactivate_for_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        let mut schedules = self.schedules.write().await;
        for row in schedules.values_mut() {
            if row.user_id == user_id && row.is_active {
                row.is_active = false;
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn update_content_for_user(&self, user_id: Uuid, content: &str) -> anyhow::Result<()> {
        let mut schedules = self.schedules.write().await;
        for row in schedules.values_mut() {
            if row.user_id == user_id && row.is_active {
                row.message_content = content.to_string();
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledMessage>> {
        let schedules = self.schedules.read().await;
        let mut due: Vec<ScheduledMessage> = schedules
            .values()
            .filter(|s| s.is_active && s.next_scheduled_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|s| s.next_scheduled_at);
        Ok(due)
    }

    async fn list_active(&self) -> anyhow::Result<Vec<ScheduledMessage>> {
        let schedules = self.schedules.read().await;
        let mut active: Vec<ScheduledMessage> = schedules
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|s| s.next_scheduled_at);
        Ok(active)
    }

    async fn stats(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> anyhow::Result<SchedulingStats> {
        let schedules = self.schedules.read().await;
        let sent_today = |s: &&ScheduledMessage| {
            s.last_sent_at
                .is_some_and(|sent| sent >= day_start && sent < day_end)
        };
        let upcoming_today = |s: &&ScheduledMessage| {
            s.is_active && s.next_scheduled_at >= day_start && s.next_scheduled_at < day_end
        };
        Ok(SchedulingStats {
            total: schedules.len() as u64,
            active: schedules.values().filter(|s| s.is_active).count() as u64,
            messages_sent_today: schedules.values().filter(sent_today).count() as u64,
            upcoming_today: schedules.values().filter(upcoming_today).count() as u64,
        })
    }
}

#[derive(Default)]
pub struct InMemoryAdminDirectory {
    admins: Arc<RwLock<Vec<Uuid>>>,
}

impl InMemoryAdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, user_id: Uuid) {
        self.admins.write().await.push(user_id);
    }
}

#[async_trait]
impl AdminDirectory for InMemoryAdminDirectory {
    async fn first_admin(&self) -> anyhow::Result<Option<Uuid>> {
        Ok(self.admins.read().await.first().copied())
    }
}

/// Process-local milestone marks. Losing them on restart at worst repeats
/// one follow-up within the same day.
#[derive(Default)]
pub struct InMemoryMilestoneMarkRepository {
    marks: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryMilestoneMarkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MilestoneMarkRepository for InMemoryMilestoneMarkRepository {
    async fn last_sent(&self, key: &str) -> anyhow::Result<Option<String>> {
        let marks = self.marks.read().await;
        Ok(marks.get(key).cloned())
    }

    async fn record_sent(&self, key: &str, day: &str) -> anyhow::Result<()> {
        let mut marks = self.marks.write().await;
        marks.insert(key.to_string(), day.to_string());
        Ok(())
    }
}
