use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;

/// Event kinds emitted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserCreated,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserCreated => "USER_CREATED",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, kind: EventKind, payload: Value) -> AppResult<()>;

    /// Name for logs
    fn name(&self) -> &'static str;
}

/// Drops every event. Used when events are disabled.
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, kind: EventKind, _payload: Value) -> AppResult<()> {
        tracing::trace!(event_kind = %kind, "Events disabled, dropping event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Keeps published events in memory, in order.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(EventKind, Value)>>,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher that records nothing and fails every call.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A publisher that sleeps for `delay` before recording each event.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<(EventKind, Value)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Polls until at least `count` events are recorded or two seconds pass,
    /// then returns what was recorded.
    pub async fn wait_for(&self, count: usize) -> Vec<(EventKind, Value)> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let events = self.events();
            if events.len() >= count || tokio::time::Instant::now() >= deadline {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, kind: EventKind, payload: Value) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(anyhow::anyhow!("publisher unavailable").into());
        }
        if let Ok(mut events) = self.events.lock() {
            events.push((kind, payload));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_recording_publisher_keeps_order() {
        let publisher = RecordingPublisher::new();
        publisher
            .publish(EventKind::UserCreated, json!({"userId": 1}))
            .await
            .unwrap();
        publisher
            .publish(EventKind::UserCreated, json!({"userId": 2}))
            .await
            .unwrap();

        let events = publisher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].1["userId"], 2);
    }

    #[tokio::test]
    async fn test_noop_and_failing_publishers() {
        assert!(NoopPublisher
            .publish(EventKind::UserCreated, Value::Null)
            .await
            .is_ok());
        assert!(RecordingPublisher::failing()
            .publish(EventKind::UserCreated, Value::Null)
            .await
            .is_err());
        assert_eq!(EventKind::UserCreated.to_string(), "USER_CREATED");
    }
}
