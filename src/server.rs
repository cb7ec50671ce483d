//! HTTP server lifecycle: storage selection, startup and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, StorageBackend, settings::Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::repositories::Repositories;
use crate::state::AppState;

pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Serves until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - Pool construction or startup migration failures
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            storage = self.settings.storage.backend.as_str(),
            auth_enabled = self.settings.jwt.is_enabled(),
            events_enabled = self.settings.events.enabled,
            "Server configuration loaded"
        );

        let repos = self.build_repositories().await?;
        let state = AppState::new(repos, &self.settings);
        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    async fn build_repositories(&self) -> anyhow::Result<Repositories> {
        match self.settings.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; profiles are lost on restart");
                Ok(Repositories::in_memory())
            }
            StorageBackend::Postgres => {
                let database = &self.settings.database;
                tracing::info!(
                    max_connections = database.max_connections,
                    min_connections = database.min_connections,
                    connection_timeout = database.connection_timeout,
                    "Initializing database connection pool"
                );

                if database.auto_migrate {
                    let applied = run_pending_migrations(&database.url).await?;
                    tracing::info!(applied = applied.len(), "Startup migrations complete");
                }

                let pool = establish_async_connection_pool(database).await?;
                Ok(Repositories::postgres(pool))
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
