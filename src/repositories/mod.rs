//! Repository layer for profile persistence.
//!
//! `ProfileStore` is the seam; `PgProfileStore` and `InMemoryProfileStore`
//! are the two backends selectable through `storage.backend`.

mod memory_profile_repo;
mod profile_repo;
mod profile_store;

pub use memory_profile_repo::InMemoryProfileStore;
pub use profile_repo::PgProfileStore;
pub use profile_store::ProfileStore;

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates the repositories handed to the service layer.
///
/// Cloning is cheap; stores are shared behind `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileStore>,
}

impl Repositories {
    /// Repositories backed by Postgres.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            profiles: Arc::new(PgProfileStore::new(pool)),
        }
    }

    /// Repositories backed by process memory.
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(InMemoryProfileStore::new()),
        }
    }
}
