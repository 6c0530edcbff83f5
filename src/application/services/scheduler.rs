use std::sync::Arc;

use chrono::{Duration, NaiveTime};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::services::{chat::ChatDelivery, clock::Clock},
    domain::{
        cadence::next_message_date,
        errors::SchedulerError,
        models::{
            DEFAULT_REMINDER, MessageKind, NewScheduledMessage, ScheduledMessage, SchedulingStats,
            SweepReport,
        },
        repositories::ScheduleRepository,
    },
};

/// Owns the reminder series lifecycle: creation with an immediate first send,
/// the periodic sweep over due rows, and the admin mutations.
pub struct MessageScheduler {
    schedules: Arc<dyn ScheduleRepository>,
    chat: Arc<dyn ChatDelivery>,
    clock: Arc<dyn Clock>,
}

impl MessageScheduler {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        chat: Arc<dyn ChatDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedules,
            chat,
            clock,
        }
    }

    /// Creates a reminder series for the user and attempts the first delivery
    /// right away. A failed first delivery is swallowed: the row stays due, so
    /// the next sweep retries it, and the schedule id is returned either way.
    pub async fn create_scheduled_message(
        &self,
        user_id: Uuid,
        admin_id: Uuid,
        custom_message: Option<String>,
    ) -> Result<Uuid, SchedulerError> {
        if self
            .schedules
            .find_active_for_user(user_id)
            .await?
            .is_some()
        {
            return Err(SchedulerError::Conflict(user_id));
        }

        let start_date = self.clock.now();
        let message_content =
            custom_message.unwrap_or_else(|| DEFAULT_REMINDER.to_string());

        let schedule = self
            .schedules
            .insert(NewScheduledMessage {
                user_id,
                admin_id,
                message_content,
                schedule_start_date: start_date,
                next_scheduled_at: start_date,
            })
            .await?;

        info!(%user_id, schedule_id = %schedule.id, "scheduled message series created, first message due immediately");

        if let Err(err) = self.send_first_message(&schedule).await {
            error!(%user_id, error = format!("{err}"), "failed to send first scheduled message");
        }

        Ok(schedule.id)
    }

    async fn send_first_message(&self, schedule: &ScheduledMessage) -> Result<(), SchedulerError> {
        self.deliver(schedule).await?;

        let second_due = next_message_date(schedule.schedule_start_date, 1);
        self.schedules
            .record_delivery(schedule.id, 1, self.clock.now(), second_due)
            .await?;

        info!(user_id = %schedule.user_id, next_scheduled_at = %second_due, "first message sent immediately");
        Ok(())
    }

    /// One sweep: every active row with `next_scheduled_at <= now` is
    /// delivered and advanced. Rows fail independently; a failed row is
    /// recorded in the report and stays due for the next sweep.
    pub async fn process_due_messages(&self) -> Result<SweepReport, SchedulerError> {
        let now = self.clock.now();
        let due = self.schedules.list_due(now).await?;
        info!(count = due.len(), at = %now, "processing due scheduled messages");

        if due.is_empty() {
            return Ok(SweepReport::default());
        }

        let total = due.len() as u32;
        let mut processed = 0;
        let mut errors = Vec::new();

        for schedule in due {
            match self.send_scheduled_message(&schedule).await {
                Ok(()) => {
                    processed += 1;
                    info!(user_id = %schedule.user_id, "processed scheduled message");
                }
                Err(err) => {
                    let message = format!(
                        "failed to process message for user {}: {err}",
                        schedule.user_id
                    );
                    error!("{message}");
                    errors.push(message);
                }
            }
        }

        Ok(SweepReport {
            processed,
            total,
            errors,
        })
    }

    async fn send_scheduled_message(
        &self,
        schedule: &ScheduledMessage,
    ) -> Result<(), SchedulerError> {
        self.deliver(schedule).await?;

        let new_count = schedule.message_count + 1;
        let next_due = next_message_date(schedule.schedule_start_date, new_count);
        self.schedules
            .record_delivery(schedule.id, new_count, self.clock.now(), next_due)
            .await?;

        info!(user_id = %schedule.user_id, next_scheduled_at = %next_due, "message sent");
        Ok(())
    }

    async fn deliver(&self, schedule: &ScheduledMessage) -> Result<(), SchedulerError> {
        self.try_deliver(schedule)
            .await
            .map_err(SchedulerError::Delivery)
    }

    async fn try_deliver(&self, schedule: &ScheduledMessage) -> anyhow::Result<()> {
        let channel_id = self
            .chat
            .resolve_or_create_channel(schedule.admin_id, schedule.user_id)
            .await?;
        let membership_id = self
            .chat
            .resolve_membership(schedule.admin_id, channel_id)
            .await?;
        self.chat
            .append_message(
                channel_id,
                membership_id,
                &schedule.message_content,
                MessageKind::ScheduledReminder,
            )
            .await
    }

    /// Soft-deactivates the user's active row(s); no-op when none exists.
    pub async fn deactivate_scheduled_message(&self, user_id: Uuid) -> Result<(), SchedulerError> {
        self.schedules.deactivate_for_user(user_id).await?;
        info!(%user_id, "deactivated scheduled messages");
        Ok(())
    }

    pub async fn update_message_content(
        &self,
        user_id: Uuid,
        new_content: String,
    ) -> Result<(), SchedulerError> {
        self.schedules
            .update_content_for_user(user_id, &new_content)
            .await?;
        info!(%user_id, "updated scheduled message content");
        Ok(())
    }

    pub async fn get_active_schedule_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ScheduledMessage>, SchedulerError> {
        Ok(self.schedules.find_active_for_user(user_id).await?)
    }

    pub async fn list_active_schedules(&self) -> Result<Vec<ScheduledMessage>, SchedulerError> {
        Ok(self.schedules.list_active().await?)
    }

    /// Aggregate counts for the admin dashboard. The "today" windows span the
    /// current UTC calendar day.
    pub async fn get_scheduling_stats(&self) -> Result<SchedulingStats, SchedulerError> {
        let now = self.clock.now();
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        Ok(self.schedules.stats(day_start, day_end).await?)
    }
}
