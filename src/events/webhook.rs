//! Delivers events as JSON `POST`s through the shared HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::EventsConfig;
use crate::error::{AppError, AppResult};
use crate::events::{EventKind, EventPublisher};
use crate::external::client::HTTP_CLIENT;

pub struct WebhookPublisher {
    url: String,
    timeout: Duration,
}

impl WebhookPublisher {
    pub fn new(config: &EventsConfig) -> Self {
        Self {
            url: config.webhook_url.trim().to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl EventPublisher for WebhookPublisher {
    /// Non-2xx responses count as failures.
    async fn publish(&self, kind: EventKind, payload: Value) -> AppResult<()> {
        let start = Instant::now();
        let response = HTTP_CLIENT
            .post(&self.url)
            .timeout(self.timeout)
            .json(&json!({
                "eventKind": kind.as_str(),
                "payload": payload,
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Event delivery failed: {}", e),
            })?;

        let status = response.status();
        tracing::debug!(
            event_kind = %kind,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Webhook responded"
        );

        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::Internal {
                source: anyhow::anyhow!("Event endpoint returned {}", status),
            })
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
