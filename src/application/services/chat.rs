use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::MessageKind;

/// Outbound seam to the chat system. Resolving a channel, resolving the
/// sender's membership within it, and appending the message are three
/// separate calls; any of them may fail and the caller decides whether the
/// failure is swallowed, collected, or propagated.
#[async_trait]
pub trait ChatDelivery: Send + Sync {
    /// Returns the conversation between the two users, creating it if needed.
    async fn resolve_or_create_channel(
        &self,
        initiator_id: Uuid,
        recipient_id: Uuid,
    ) -> anyhow::Result<Uuid>;

    /// Returns the user's membership identity within the channel.
    async fn resolve_membership(&self, user_id: Uuid, channel_id: Uuid) -> anyhow::Result<Uuid>;

    async fn append_message(
        &self,
        channel_id: Uuid,
        sender_membership_id: Uuid,
        body: &str,
        kind: MessageKind,
    ) -> anyhow::Result<()>;
}
