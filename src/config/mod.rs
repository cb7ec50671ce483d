//! Configuration management for caregiver-hub
//!
//! Settings are layered from TOML files under `config/` and `CAREHUB_*`
//! environment variables; see [`loader`] for the precedence rules.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{
    DatabaseConfig, EventsConfig, JwtConfig, LoggerSettings, ServerConfig, Settings,
    StorageBackend,
};
