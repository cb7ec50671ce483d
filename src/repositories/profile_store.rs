//! Storage seam for profiles.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Profile, UserRole};

/// Persistence operations the profile service depends on.
///
/// Implementations must enforce uniqueness of `external_auth_id` and `email`
/// themselves and report a collision as `AppError::Duplicate`, since the
/// existence checks done before `create` can race.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Profile>>;

    async fn find_by_external_auth_id(&self, external_auth_id: &str) -> AppResult<Option<Profile>>;

    /// Every profile, ordered by id.
    async fn find_all(&self) -> AppResult<Vec<Profile>>;

    /// All profiles with `role`, ordered by id.
    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<Profile>>;

    async fn exists_by_external_auth_id(&self, external_auth_id: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Inserts `profile` and returns it with its assigned id. The incoming
    /// `id` is ignored.
    async fn create(&self, profile: Profile) -> AppResult<Profile>;

    /// Overwrites the stored profile with the same id.
    async fn save(&self, profile: &Profile) -> AppResult<Profile>;

    /// Round trip to the backend, for health checks.
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}
