//! PostgreSQL connection pooling and embedded migrations.

mod migrate;
mod pool;

pub use migrate::{pending_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool};
