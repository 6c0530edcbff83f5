use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::domain::{
    models::{NewScheduledMessage, ScheduledMessage, SchedulingStats},
    repositories::{AdminDirectory, ScheduleRepository},
};

pub type PgPool = Pool<Postgres>;

#[derive(Clone)]
pub struct PostgresScheduleRepository {
    pool: PgPool,
}

impl PostgresScheduleRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository {
    async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ScheduledMessage>> {
        let record = sqlx::query_as::<_, ScheduledMessageRecord>(
            r#"
            SELECT id, user_id, admin_id, message_content, schedule_start_date, message_count,
                   last_sent_at, next_scheduled_at, is_active, created_at, updated_at
            FROM scheduled_messages
            WHERE user_id = $1
              AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(ScheduledMessage::from))
    }

    async fn insert(&self, schedule: NewScheduledMessage) -> anyhow::Result<ScheduledMessage> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, ScheduledMessageRecord>(
            r#"
            INSERT INTO scheduled_messages (
                id, user_id, admin_id, message_content, schedule_start_date,
                message_count, next_scheduled_at, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, 0, $6, TRUE, $7, $7)
            RETURNING id, user_id, admin_id, message_content, schedule_start_date, message_count,
                      last_sent_at, next_scheduled_at, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(schedule.user_id)
        .bind(schedule.admin_id)
        .bind(&schedule.message_content)
        .bind(schedule.schedule_start_date)
        .bind(schedule.next_scheduled_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(record.into())
    }

    async fn record_delivery(
        &self,
        id: Uuid,
        message_count: u32,
        last_sent_at: DateTime<Utc>,
        next_scheduled_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_messages
            SET message_count = $2,
                last_sent_at = $3,
                next_scheduled_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(message_count as i32)
        .bind(last_sent_at)
        .bind(next_scheduled_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn deactivate_for_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_messages
            SET is_active = FALSE,
                updated_at = $2
            WHERE user_id = $1
              AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_content_for_user(&self, user_id: Uuid, content: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_messages
            SET message_content = $2,
                updated_at = $3
            WHERE user_id = $1
              AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledMessage>> {
        let rows = sqlx::query_as::<_, ScheduledMessageRecord>(
            r#"
            SELECT id, user_id, admin_id, message_content, schedule_start_date, message_count,
                   last_sent_at, next_scheduled_at, is_active, created_at, updated_at
            FROM scheduled_messages
            WHERE is_active = TRUE
              AND next_scheduled_at <= $1
            ORDER BY next_scheduled_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ScheduledMessage::from).collect())
    }

    async fn list_active(&self) -> anyhow::Result<Vec<ScheduledMessage>> {
        let rows = sqlx::query_as::<_, ScheduledMessageRecord>(
            r#"
            SELECT id, user_id, admin_id, message_content, schedule_start_date, message_count,
                   last_sent_at, next_scheduled_at, is_active, created_at, updated_at
            FROM scheduled_messages
            WHERE is_active = TRUE
            ORDER BY next_scheduled_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ScheduledMessage::from).collect())
    }

    async fn stats(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> anyhow::Result<SchedulingStats> {
        let total = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM scheduled_messages"#)
            .fetch_one(&self.pool)
            .await?;
        let active = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM scheduled_messages WHERE is_active = TRUE"#,
        )
        .fetch_one(&self.pool)
        .await?;
        let messages_sent_today = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM scheduled_messages
            WHERE last_sent_at >= $1
              AND last_sent_at < $2
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;
        let upcoming_today = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM scheduled_messages
            WHERE is_active = TRUE
              AND next_scheduled_at >= $1
              AND next_scheduled_at < $2
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(SchedulingStats {
            total: total as u64,
            active: active as u64,
            messages_sent_today: messages_sent_today as u64,
            upcoming_today: upcoming_today as u64,
        })
    }
}

#[derive(Clone)]
pub struct PostgresAdminDirectory {
    pool: PgPool,
}

impl PostgresAdminDirectory {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl AdminDirectory for PostgresAdminDirectory {
    async fn first_admin(&self) -> anyhow::Result<Option<Uuid>> {
        let admin_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE role = 'admin'
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin_id)
    }
}

#[derive(FromRow)]
struct ScheduledMessageRecord {
    id: Uuid,
    user_id: Uuid,
    admin_id: Uuid,
    message_content: String,
    schedule_start_date: DateTime<Utc>,
    message_count: i32,
    last_sent_at: Option<DateTime<Utc>>,
    next_scheduled_at: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScheduledMessageRecord> for ScheduledMessage {
    fn from(record: ScheduledMessageRecord) -> Self {
        ScheduledMessage {
            id: record.id,
            user_id: record.user_id,
            admin_id: record.admin_id,
            message_content: record.message_content,
            schedule_start_date: record.schedule_start_date,
            message_count: record.message_count.max(0) as u32,
            last_sent_at: record.last_sent_at,
            next_scheduled_at: record.next_scheduled_at,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
