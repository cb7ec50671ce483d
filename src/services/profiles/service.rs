//! Profile use cases over a [`ProfileStore`] and an [`EventPublisher`].

use std::sync::Arc;

use jiff::Timestamp;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::events::{EventKind, EventPublisher};
use crate::models::{NewProfile, Profile, ProfileKey, ProfilePatch, UserRole, VerificationStatus};
use crate::repositories::ProfileStore;
use crate::services::profiles::completeness::{self, CompletenessReport};
use crate::services::profiles::dispatcher;
use crate::services::profiles::filter::{self, SearchQuery};
use crate::services::profiles::ranking::{self, SearchPage};

/// Handlers go through this service for every profile operation.
///
/// Cloning is cheap; the store and the publisher are shared.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    events: Arc<dyn EventPublisher>,
    event_source: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ProfileService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        events: Arc<dyn EventPublisher>,
        event_source: impl Into<String>,
    ) -> Self {
        Self {
            store,
            events,
            event_source: event_source.into(),
        }
    }

    pub fn storage_backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn check_storage(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Registers a profile and announces it with a `USER_CREATED` event.
    ///
    /// # Errors
    /// `Duplicate` when the external auth id or the email is already taken,
    /// checked in that order. The store repeats the check atomically, so a
    /// concurrent registration still ends in `Duplicate`.
    pub async fn create_profile(&self, new_profile: NewProfile) -> AppResult<Profile> {
        let NewProfile {
            external_auth_id,
            email,
            role,
            primary_phone,
            display_name,
        } = new_profile;

        let (auth_id_taken, email_taken) = futures::try_join!(
            self.store.exists_by_external_auth_id(&external_auth_id),
            self.store.exists_by_email(&email),
        )?;
        if auth_id_taken {
            return Err(AppError::duplicate_identity(
                "externalAuthId",
                &external_auth_id,
            ));
        }
        if email_taken {
            return Err(AppError::duplicate_identity("email", &email));
        }

        let mut profile = Profile::new(external_auth_id, email, role, Timestamp::now());
        profile.primary_phone = non_blank(primary_phone);
        profile.display_name = non_blank(display_name);
        profile.profile_completion_percentage = completeness::score(&profile);

        let created = self.store.create(profile).await?;
        tracing::info!(
            profile_id = created.id,
            external_auth_id = %created.external_auth_id,
            role = %created.role,
            "Profile created"
        );

        self.publish_created(&created);
        Ok(created)
    }

    /// Publishes on a detached task; a failed publish is logged and dropped.
    fn publish_created(&self, profile: &Profile) {
        let payload = json!({
            "eventId": Uuid::new_v4().to_string(),
            "eventType": EventKind::UserCreated.as_str(),
            "timestamp": Timestamp::now().to_string(),
            "source": self.event_source,
            "userId": profile.id,
            "userEmail": profile.email,
            "userType": profile.role.as_str(),
        });

        let events = Arc::clone(&self.events);
        let profile_id = profile.id;
        tokio::spawn(async move {
            if let Err(e) = events.publish(EventKind::UserCreated, payload).await {
                tracing::warn!(
                    profile_id,
                    publisher = events.name(),
                    error = %e,
                    "Failed to publish USER_CREATED event"
                );
            }
        });
    }

    /// # Errors
    /// `NotFound` naming the key that missed.
    pub async fn get_profile(&self, key: &ProfileKey) -> AppResult<Profile> {
        let found = match key {
            ProfileKey::Id(id) => self.store.find_by_id(*id).await?,
            ProfileKey::ExternalAuthId(auth_id) => {
                self.store.find_by_external_auth_id(auth_id).await?
            }
        };
        found.ok_or_else(|| {
            let (field, value) = key.describe();
            AppError::profile_not_found(field, value)
        })
    }

    /// Every profile of either role, by id.
    pub async fn list_profiles(&self) -> AppResult<Vec<Profile>> {
        self.store.find_all().await
    }

    pub async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>> {
        self.store.find_by_role(role).await
    }

    /// Every caregiver regardless of status, by id.
    pub async fn list_caregivers(&self) -> AppResult<Vec<Profile>> {
        self.list_by_role(UserRole::Caregiver).await
    }

    /// Active caregivers flagged as featured, by id.
    pub async fn list_featured_caregivers(&self) -> AppResult<Vec<Profile>> {
        let mut caregivers = self.list_caregivers().await?;
        caregivers.retain(|p| p.is_featured && p.is_active);
        Ok(caregivers)
    }

    /// Active caregivers whose verification completed, by id.
    pub async fn list_verified_caregivers(&self) -> AppResult<Vec<Profile>> {
        let mut caregivers = self.list_caregivers().await?;
        caregivers.retain(|p| p.verification_status == VerificationStatus::Verified && p.is_active);
        Ok(caregivers)
    }

    /// Applies every present field of `patch`, re-scores and saves.
    pub async fn update_profile(&self, key: &ProfileKey, patch: ProfilePatch) -> AppResult<Profile> {
        let mut profile = self.get_profile(key).await?;
        dispatcher::apply_patch(&mut profile, patch, Timestamp::now());

        let saved = self.store.save(&profile).await?;
        tracing::info!(
            profile_id = saved.id,
            completion = saved.profile_completion_percentage,
            "Profile updated"
        );
        Ok(saved)
    }

    /// Sets one field addressed by its registry name, re-scores and saves.
    ///
    /// # Errors
    /// `NotFound`, `UnknownField` or `TypeMismatch`; nothing is written in
    /// any of those cases.
    pub async fn update_profile_field(
        &self,
        key: &ProfileKey,
        field_name: &str,
        value: &Value,
    ) -> AppResult<Profile> {
        let mut profile = self.get_profile(key).await?;
        dispatcher::apply_field(&mut profile, field_name, value, Timestamp::now())?;

        let saved = self.store.save(&profile).await?;
        tracing::info!(
            profile_id = saved.id,
            field = field_name,
            completion = saved.profile_completion_percentage,
            "Profile field updated"
        );
        Ok(saved)
    }

    pub async fn get_completion(&self, key: &ProfileKey) -> AppResult<CompletenessReport> {
        let profile = self.get_profile(key).await?;
        Ok(completeness::evaluate(&profile))
    }

    /// Runs a caregiver search and returns the requested page.
    ///
    /// # Errors
    /// `InvalidSort` or `Validation` for a malformed query, before the store
    /// is touched.
    pub async fn search_caregivers(&self, query: &SearchQuery) -> AppResult<SearchPage<Profile>> {
        let search = filter::compile(query)?;
        let candidates = self.store.find_by_role(UserRole::Caregiver).await?;
        let page = ranking::rank(candidates, &search);

        tracing::debug!(
            total = page.total,
            page = page.page,
            size = page.size,
            "Caregiver search"
        );
        Ok(page)
    }
}
