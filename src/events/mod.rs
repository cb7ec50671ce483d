//! Outbound domain events.
//!
//! Publication is best-effort. Callers log failures and carry on; nothing
//! here may fail the operation that produced the event.

mod publisher;
mod webhook;

pub use publisher::{EventKind, EventPublisher, NoopPublisher, RecordingPublisher};
pub use webhook::WebhookPublisher;

use std::sync::Arc;

use crate::config::EventsConfig;

/// Picks the publisher for `config`: a webhook when enabled, otherwise a no-op.
pub fn publisher_from_config(config: &EventsConfig) -> Arc<dyn EventPublisher> {
    if config.enabled {
        Arc::new(WebhookPublisher::new(config))
    } else {
        Arc::new(NoopPublisher)
    }
}
