//! Serve command handler

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server until shutdown, or only reports the effective
    /// configuration when `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config)
            .run()
            .await
            .map_err(|source| AppError::Internal { source })
    }

    fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Storage backend: {}", self.config.storage.backend.as_str());
        println!(
            "✓ Bearer authentication: {}",
            if self.config.jwt.is_enabled() { "enabled" } else { "disabled" }
        );
        println!(
            "✓ Event publishing: {}",
            if self.config.events.enabled { "enabled" } else { "disabled" }
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
