use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::services::chat::ChatDelivery,
    domain::models::MessageKind,
    infrastructure::repositories::postgres::PgPool,
};

/// Chat delivery against the shared store's chat tables: the
/// `get_or_create_chat` function owns channel resolution, `chat_user` holds
/// per-channel membership rows, and messages land in `message`.
pub struct PostgresChatDelivery {
    pool: PgPool,
}

impl PostgresChatDelivery {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl ChatDelivery for PostgresChatDelivery {
    async fn resolve_or_create_channel(
        &self,
        initiator_id: Uuid,
        recipient_id: Uuid,
    ) -> anyhow::Result<Uuid> {
        let channel_id = sqlx::query_scalar::<_, Uuid>(r#"SELECT get_or_create_chat($1, $2)"#)
            .bind(initiator_id)
            .bind(recipient_id)
            .fetch_one(&self.pool)
            .await
            .context("failed to get or create chat")?;
        Ok(channel_id)
    }

    async fn resolve_membership(&self, user_id: Uuid, channel_id: Uuid) -> anyhow::Result<Uuid> {
        let membership_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM chat_user
            WHERE chat_id = $1
              AND user_id = $2
            "#,
        )
        .bind(channel_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("failed to resolve chat membership")?;
        Ok(membership_id)
    }

    async fn append_message(
        &self,
        channel_id: Uuid,
        sender_membership_id: Uuid,
        body: &str,
        kind: MessageKind,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO message (chat_id, created_by, type, text, media_url)
            VALUES ($1, $2, $3, $4, '')
            "#,
        )
        .bind(channel_id)
        .bind(sender_membership_id)
        .bind(kind.as_str())
        .bind(body)
        .execute(&self.pool)
        .await
        // Keep the store's own error detail visible for diagnosis.
        .map_err(|err| anyhow::anyhow!("failed to insert message: {err}"))?;
        Ok(())
    }
}
