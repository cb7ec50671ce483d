//! Process-local profile store.
//!
//! Backs the `memory` storage backend and the test suites. Data lives in a
//! `DashMap` keyed by id and is lost on restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{Profile, UserRole};
use crate::repositories::ProfileStore;

#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<i64, Profile>>,
    next_id: Arc<AtomicI64>,
    /// Serializes writers so the uniqueness checks and the insert are atomic.
    write_lock: Arc<Mutex<()>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_conflict(&self, candidate: &Profile) -> Option<AppError> {
        self.profiles.iter().find_map(|entry| {
            let other = entry.value();
            if other.id == candidate.id {
                None
            } else if other.external_auth_id == candidate.external_auth_id {
                Some(AppError::duplicate_identity(
                    "externalAuthId",
                    &candidate.external_auth_id,
                ))
            } else if other.email == candidate.email {
                Some(AppError::duplicate_identity("email", &candidate.email))
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Profile>> {
        Ok(self.profiles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_external_auth_id(&self, external_auth_id: &str) -> AppResult<Option<Profile>> {
        Ok(self
            .profiles
            .iter()
            .find(|entry| entry.external_auth_id == external_auth_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<Profile>> {
        let mut found: Vec<Profile> = self
            .profiles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>> {
        let mut found: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|entry| entry.role == role)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn exists_by_external_auth_id(&self, external_auth_id: &str) -> AppResult<bool> {
        Ok(self
            .profiles
            .iter()
            .any(|entry| entry.external_auth_id == external_auth_id))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.profiles.iter().any(|entry| entry.email == email))
    }

    async fn create(&self, mut profile: Profile) -> AppResult<Profile> {
        let _guard = self.write_lock.lock().await;

        profile.id = 0;
        if let Some(conflict) = self.find_conflict(&profile) {
            return Err(conflict);
        }
        profile.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn save(&self, profile: &Profile) -> AppResult<Profile> {
        let _guard = self.write_lock.lock().await;

        if !self.profiles.contains_key(&profile.id) {
            return Err(AppError::profile_not_found("id", profile.id));
        }
        if let Some(conflict) = self.find_conflict(profile) {
            return Err(conflict);
        }
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
