//! Application state shared across request handlers.

use std::sync::Arc;

use crate::auth::{JwtSubjectVerifier, SubjectVerifier};
use crate::config::Settings;
use crate::events::{EventPublisher, NoopPublisher, publisher_from_config};
use crate::repositories::Repositories;
use crate::services::Services;

/// Handed to every handler through axum's `State` extractor.
///
/// Cloning is cheap since services and the verifier sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Resolves bearer tokens on `/me` routes
    pub verifier: Arc<dyn SubjectVerifier>,
}

impl AppState {
    /// Builds the state from loaded settings and an already chosen storage.
    pub fn new(repos: Repositories, settings: &Settings) -> Self {
        let events = publisher_from_config(&settings.events);
        let verifier: Arc<dyn SubjectVerifier> =
            Arc::new(JwtSubjectVerifier::new(&settings.jwt));
        Self::from_parts(repos, events, verifier, &settings.events.source)
    }

    pub fn from_parts(
        repos: Repositories,
        events: Arc<dyn EventPublisher>,
        verifier: Arc<dyn SubjectVerifier>,
        event_source: &str,
    ) -> Self {
        Self {
            services: Services::new(repos, events, event_source),
            verifier,
        }
    }

    /// In-memory storage, no events, JWT verification with `settings.jwt`.
    ///
    /// Used by integration tests and `storage.backend = "memory"`.
    pub fn in_memory(settings: &Settings) -> Self {
        Self::from_parts(
            Repositories::in_memory(),
            Arc::new(NoopPublisher),
            Arc::new(JwtSubjectVerifier::new(&settings.jwt)),
            &settings.events.source,
        )
    }
}
