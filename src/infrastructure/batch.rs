use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::error;

use crate::application::usecases::run_sweep::{BatchTrigger, SweepOutcome};

/// Supplied from the environment; the endpoint URL and service key were never
/// meant to live in source.
#[derive(Clone)]
pub struct BatchTriggerConfig {
    pub endpoint_url: String,
    pub service_key: String,
}

/// Invokes the server-side batch endpoint that runs the same due-message
/// sweep against the shared store.
pub struct RemoteBatchTrigger {
    http: Client,
    config: BatchTriggerConfig,
}

impl RemoteBatchTrigger {
    pub fn new(config: BatchTriggerConfig) -> Arc<dyn BatchTrigger> {
        Arc::new(Self {
            http: Client::builder()
                .user_agent("sage-scheduler/batch")
                .build()
                .expect("failed to build batch trigger client"),
            config,
        }) as Arc<dyn BatchTrigger>
    }

    async fn call(&self) -> anyhow::Result<SweepOutcome> {
        let response = self
            .http
            .post(&self.config.endpoint_url)
            .bearer_auth(&self.config.service_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("batch endpoint returned status {}", response.status());
        }

        Ok(response.json::<SweepOutcome>().await?)
    }
}

#[async_trait]
impl BatchTrigger for RemoteBatchTrigger {
    async fn trigger(&self) -> SweepOutcome {
        match self.call().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = format!("{err:#}"), "failed to trigger batch endpoint");
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
