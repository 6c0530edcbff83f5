use crate::{
    application::usecases::run_sweep::SweepOutcome,
    domain::models::{ScheduledMessage, SchedulingStats, SweepReport},
    presentation::http::responses::{ScheduledMessageDto, SchedulingStatsDto, SweepResponseDto},
};

pub fn map_schedule(schedule: &ScheduledMessage) -> ScheduledMessageDto {
    ScheduledMessageDto {
        id: schedule.id,
        user_id: schedule.user_id,
        admin_id: schedule.admin_id,
        message_content: schedule.message_content.clone(),
        schedule_start_date: schedule.schedule_start_date.to_rfc3339(),
        message_count: schedule.message_count,
        last_sent_at: schedule.last_sent_at.map(|sent| sent.to_rfc3339()),
        next_scheduled_at: schedule.next_scheduled_at.to_rfc3339(),
        is_active: schedule.is_active,
        created_at: schedule.created_at.to_rfc3339(),
        updated_at: schedule.updated_at.to_rfc3339(),
    }
}

pub fn map_stats(stats: SchedulingStats) -> SchedulingStatsDto {
    SchedulingStatsDto {
        total: stats.total,
        active: stats.active,
        messages_sent_today: stats.messages_sent_today,
        upcoming_today: stats.upcoming_today,
    }
}

pub fn map_sweep_report(report: SweepReport) -> SweepResponseDto {
    SweepResponseDto {
        success: true,
        processed: report.processed,
        total: report.total,
        errors: if report.errors.is_empty() {
            None
        } else {
            Some(report.errors)
        },
    }
}

pub fn map_sweep_outcome(outcome: SweepOutcome) -> SweepResponseDto {
    SweepResponseDto {
        success: outcome.success,
        processed: outcome.processed,
        total: outcome.total,
        errors: outcome.errors.filter(|errors| !errors.is_empty()),
    }
}
