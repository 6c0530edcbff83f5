use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::application::services::scheduler::MessageScheduler;

/// Outcome of one sweep trigger, regardless of which path ran it. Mirrors the
/// batch endpoint's response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub success: bool,
    pub processed: u32,
    #[serde(default)]
    pub total: u32,
    /// Absent when the sweep was clean.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// A sweep running somewhere else against the same store, reachable over
/// HTTP. Implementations fold every transport failure into a
/// `success: false` outcome.
#[async_trait]
pub trait BatchTrigger: Send + Sync {
    async fn trigger(&self) -> SweepOutcome;
}

/// The two equivalent sweep entry points behind one call: the in-process
/// sweep, or the remote batch endpoint when one is configured.
pub struct RunSweepUseCase {
    scheduler: Arc<MessageScheduler>,
    remote: Option<Arc<dyn BatchTrigger>>,
}

impl RunSweepUseCase {
    pub fn new(scheduler: Arc<MessageScheduler>, remote: Option<Arc<dyn BatchTrigger>>) -> Self {
        Self { scheduler, remote }
    }

    pub async fn execute(&self) -> SweepOutcome {
        if let Some(remote) = &self.remote {
            info!("triggering remote sweep of due messages");
            return remote.trigger().await;
        }

        info!("starting in-process sweep of due messages");
        match self.scheduler.process_due_messages().await {
            Ok(report) => SweepOutcome {
                success: true,
                processed: report.processed,
                total: report.total,
                errors: if report.errors.is_empty() {
                    None
                } else {
                    Some(report.errors)
                },
            },
            Err(err) => {
                error!(error = format!("{err}"), "sweep failed");
                SweepOutcome {
                    success: false,
                    processed: 0,
                    total: 0,
                    errors: Some(vec![err.to_string()]),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        application::services::{chat::ChatDelivery, clock::SystemClock},
        domain::{
            models::{MessageKind, NewScheduledMessage, ScheduledMessage, SchedulingStats},
            repositories::ScheduleRepository,
        },
        infrastructure::repositories::in_memory::InMemoryScheduleRepository,
    };

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

    /// Fails the due query, as an unreachable store would.
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

    fn scheduler_with(repo: Arc<dyn ScheduleRepository>) -> Arc<MessageScheduler> {
        Arc::new(MessageScheduler::new(
            repo,
            Arc::new(NoopChat),
            Arc::new(SystemClock),
        ))
    }

    #[tokio::test]
    async fn in_process_sweep_reports_success() {
        let usecase = RunSweepUseCase::new(
            scheduler_with(Arc::new(InMemoryScheduleRepository::new())),
            None,
        );
        let outcome = usecase.execute().await;
        assert!(outcome.success);
        assert_eq!(outcome.processed, 0);
        assert_eq!(outcome.total, 0);
    }

    #[tokio::test]
    async fn store_failure_becomes_unsuccessful_outcome() {
        let usecase = RunSweepUseCase::new(scheduler_with(Arc::new(UnreachableStore)), None);
        let outcome = usecase.execute().await;
        assert!(!outcome.success);
        assert_eq!(outcome.processed, 0);
        let errors = outcome.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("store unreachable"));
    }

    #[tokio::test]
    async fn remote_path_takes_precedence() {
        struct StaticTrigger;

        #[async_trait]
        impl BatchTrigger for StaticTrigger {
            async fn trigger(&self) -> SweepOutcome {
                SweepOutcome {
                    success: true,
                    processed: 5,
                    total: 5,
                    errors: None,
                }
            }
        }

        let usecase = RunSweepUseCase::new(
            scheduler_with(Arc::new(UnreachableStore)),
            Some(Arc::new(StaticTrigger)),
        );
        let outcome = usecase.execute().await;
        assert!(outcome.success);
        assert_eq!(outcome.processed, 5);
    }
}
