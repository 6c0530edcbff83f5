use serde::{Deserialize, Serialize};

/// Discriminator stored in the chat message `type` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    ScheduledReminder,
    ActivationFollowup,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::ScheduledReminder => "scheduled_reminder",
            MessageKind::ActivationFollowup => "activation_followup",
        }
    }
}
