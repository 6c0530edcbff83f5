use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("user {0} already has an active scheduled message series")]
    Conflict(Uuid),
    #[error("delivery failed: {0:#}")]
    Delivery(anyhow::Error),
    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}
