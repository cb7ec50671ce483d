//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, event publishers and handlers.

pub mod profiles;

pub use profiles::ProfileService;

use std::sync::Arc;

use crate::events::EventPublisher;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap; everything inside is shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub profiles: ProfileService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        events: Arc<dyn EventPublisher>,
        event_source: impl Into<String>,
    ) -> Self {
        Self {
            profiles: ProfileService::new(repos.profiles, events, event_source),
        }
    }
}
