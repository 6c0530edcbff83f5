use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::services::{chat::ChatDelivery, clock::Clock},
    domain::{
        models::MessageKind,
        repositories::{AdminDirectory, MilestoneMarkRepository},
    },
};

/// Days since activation on which a follow-up is actually sent. The message
/// catalog below covers more days than this; the gate is authoritative.
const MILESTONE_DAYS: [i64; 2] = [7, 14];

/// Sends a congratulatory follow-up when a login lands on an activation
/// milestone day. Runs inline during session establishment, so every failure
/// is absorbed: this must never block app usage.
pub struct ActivationMilestoneNotifier {
    chat: Arc<dyn ChatDelivery>,
    admins: Arc<dyn AdminDirectory>,
    marks: Arc<dyn MilestoneMarkRepository>,
    clock: Arc<dyn Clock>,
}

impl ActivationMilestoneNotifier {
    pub fn new(
        chat: Arc<dyn ChatDelivery>,
        admins: Arc<dyn AdminDirectory>,
        marks: Arc<dyn MilestoneMarkRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chat,
            admins,
            marks,
            clock,
        }
    }

    pub fn should_send_activation_message(
        &self,
        activation_date: Option<DateTime<Utc>>,
    ) -> bool {
        let Some(activated_at) = activation_date else {
            return false;
        };
        MILESTONE_DAYS.contains(&days_since(activated_at, self.clock.now()))
    }

    pub fn activation_message(&self, activation_date: DateTime<Utc>) -> String {
        milestone_message(days_since(activation_date, self.clock.now()))
    }

    /// Checks the milestone gate and the per-day mark, then delivers at most
    /// one follow-up for this user/activation pair per calendar day.
    pub async fn check_and_send(&self, user_id: Uuid, activation_date: Option<DateTime<Utc>>) {
        let Some(activated_at) = activation_date else {
            return;
        };
        if !self.should_send_activation_message(Some(activated_at)) {
            return;
        }

        let mark_key = format!("activation_message_{user_id}_{}", activated_at.to_rfc3339());
        let today = self.clock.now().date_naive().to_string();

        match self.marks.last_sent(&mark_key).await {
            Ok(Some(day)) if day == today => return,
            Ok(_) => {}
            Err(err) => {
                // Worst case without the mark is one duplicate send today.
                warn!(%user_id, error = format!("{err:#}"), "failed to read milestone mark");
            }
        }

        if let Err(err) = self.send_follow_up(user_id, activated_at).await {
            warn!(%user_id, error = format!("{err:#}"), "failed to send activation follow-up");
        }

        if let Err(err) = self.marks.record_sent(&mark_key, &today).await {
            warn!(%user_id, error = format!("{err:#}"), "failed to record milestone mark");
        }
    }

    async fn send_follow_up(
        &self,
        user_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let Some(admin_id) = self.admins.first_admin().await? else {
            info!("no admin user found to send activation message");
            return Ok(());
        };

        let channel_id = self
            .chat
            .resolve_or_create_channel(admin_id, user_id)
            .await?;
        let membership_id = self.chat.resolve_membership(admin_id, channel_id).await?;
        let message = self.activation_message(activated_at);
        self.chat
            .append_message(
                channel_id,
                membership_id,
                &message,
                MessageKind::ActivationFollowup,
            )
            .await?;

        info!(%user_id, "activation follow-up message sent");
        Ok(())
    }
}

fn days_since(activated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - activated_at).num_days()
}

fn milestone_message(days: i64) -> String {
    let message = match days {
        1 => "Welcome to Project Sage! 🎉 We're excited to have you on board. How are you finding the app so far?",
        3 => "Hi there! It's been 3 days since you joined us. Do you have any questions about using the app? We're here to help! 😊",
        7 => "A week has passed since you joined Project Sage! We hope you're enjoying the experience. Is there anything specific you'd like to know more about?",
        14 => "Two weeks with Project Sage! 🌟 We'd love to hear your feedback. How has your experience been? Any suggestions for improvement?",
        30 => "It's been a month since you joined us! 🎊 Thank you for being part of the Project Sage community. We value your participation and would love to hear about your journey so far.",
        _ => "Thank you for being part of Project Sage! We're here if you need any assistance. 💙",
    };
    message.to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::infrastructure::repositories::in_memory::{
        InMemoryAdminDirectory, InMemoryMilestoneMarkRepository,
    };

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct StubChat {
        sent: Mutex<Vec<(Uuid, String, MessageKind)>>,
        fail: Mutex<bool>,
        pending_recipient: Mutex<Option<Uuid>>,
    }

    impl StubChat {
        fn sent(&self) -> Vec<(Uuid, String, MessageKind)> {
            self.sent.lock().unwrap().clone()
        }

        fn set_failing(&self) {
            *self.fail.lock().unwrap() = true;
        }
    }

    #[async_trait::async_trait]
    impl ChatDelivery for StubChat {
        async fn resolve_or_create_channel(
            &self,
            _initiator_id: Uuid,
            recipient_id: Uuid,
        ) -> anyhow::Result<Uuid> {
            if *self.fail.lock().unwrap() {
                anyhow::bail!("chat unavailable");
            }
            *self.pending_recipient.lock().unwrap() = Some(recipient_id);
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
            body: &str,
            kind: MessageKind,
        ) -> anyhow::Result<()> {
            let recipient = self.pending_recipient.lock().unwrap().take().unwrap();
            self.sent
                .lock()
                .unwrap()
                .push((recipient, body.to_string(), kind));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap()
    }

    struct Fixture {
        notifier: ActivationMilestoneNotifier,
        chat: Arc<StubChat>,
        admins: Arc<InMemoryAdminDirectory>,
    }

    async fn fixture_with_admin() -> Fixture {
        let fx = fixture();
        fx.admins.register(Uuid::new_v4()).await;
        fx
    }

    fn fixture() -> Fixture {
        let chat = Arc::new(StubChat::default());
        let admins = Arc::new(InMemoryAdminDirectory::new());
        let notifier = ActivationMilestoneNotifier::new(
            chat.clone(),
            admins.clone(),
            Arc::new(InMemoryMilestoneMarkRepository::new()),
            Arc::new(FixedClock(now())),
        );
        Fixture {
            notifier,
            chat,
            admins,
        }
    }

    fn activated_days_ago(days: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::days(days))
    }

    #[tokio::test]
    async fn gate_opens_only_on_milestone_days() {
        let fx = fixture();
        for days in [7, 14] {
            assert!(
                fx.notifier
                    .should_send_activation_message(activated_days_ago(days)),
                "day {days} must trigger"
            );
        }
        for days in [0, 6, 8, 13, 15, 30] {
            assert!(
                !fx.notifier
                    .should_send_activation_message(activated_days_ago(days)),
                "day {days} must not trigger"
            );
        }
        assert!(!fx.notifier.should_send_activation_message(None));
    }

    #[tokio::test]
    async fn catalog_covers_more_days_than_the_gate() {
        let fx = fixture();
        let expectations = [
            (1, "Welcome to Project Sage"),
            (3, "3 days since you joined"),
            (7, "A week has passed"),
            (14, "Two weeks with Project Sage"),
            (30, "a month since you joined"),
        ];
        for (days, needle) in expectations {
            let message = fx
                .notifier
                .activation_message(activated_days_ago(days).unwrap());
            assert!(message.contains(needle), "day {days}: {message}");
        }

        // Any other day count falls back to the generic thank-you.
        let fallback = fx
            .notifier
            .activation_message(activated_days_ago(10).unwrap());
        assert!(fallback.contains("Thank you for being part of Project Sage"));
    }

    #[tokio::test]
    async fn sends_at_most_once_per_day() {
        let fx = fixture_with_admin().await;
        let user = Uuid::new_v4();

        fx.notifier
            .check_and_send(user, activated_days_ago(7))
            .await;
        fx.notifier
            .check_and_send(user, activated_days_ago(7))
            .await;

        let sent = fx.chat.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, user);
        assert_eq!(sent[0].2, MessageKind::ActivationFollowup);
    }

    #[tokio::test]
    async fn skips_non_milestone_days() {
        let fx = fixture_with_admin().await;
        fx.notifier
            .check_and_send(Uuid::new_v4(), activated_days_ago(6))
            .await;
        fx.notifier.check_and_send(Uuid::new_v4(), None).await;
        assert!(fx.chat.sent().is_empty());
    }

    #[tokio::test]
    async fn absorbs_chat_failures() {
        let fx = fixture_with_admin().await;
        fx.chat.set_failing();
        fx.notifier
            .check_and_send(Uuid::new_v4(), activated_days_ago(14))
            .await;
        assert!(fx.chat.sent().is_empty());
    }

    #[tokio::test]
    async fn does_nothing_without_an_admin() {
        let fx = fixture();
        fx.notifier
            .check_and_send(Uuid::new_v4(), activated_days_ago(7))
            .await;
        assert!(fx.chat.sent().is_empty());
    }
}
