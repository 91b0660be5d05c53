//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs and validates the configuration
    /// 2. Applies pending migrations when `database.auto_migrate` is set
    /// 3. Initializes the database connection pool and application state
    /// 4. Checks the notifier; a broken notifier is logged, not fatal
    /// 5. Binds and serves with graceful shutdown
    ///
    /// # Errors
    /// - Invalid JWT configuration
    /// - Migration, connection pool or address binding failures
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;
        let environment = self.environment;
        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %environment,
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = %settings.server.port,
            request_timeout = %settings.server.request_timeout,
            keep_alive_timeout = %settings.server.keep_alive_timeout,
            "Server configuration loaded"
        );

        // Database URL is left out; it carries credentials
        tracing::info!(
            max_connections = %settings.database.max_connections,
            min_connections = %settings.database.min_connections,
            connection_timeout = %settings.database.connection_timeout,
            auto_migrate = %settings.database.auto_migrate,
            "Database configuration loaded"
        );

        tracing::info!(
            max_allocation_attempts = settings.registration.max_allocation_attempts,
            generate_one_time_password = settings.registration.generate_one_time_password,
            notifier = %settings.notifier.provider.as_str(),
            "Registration configuration loaded"
        );
        if environment.is_deployed() && !settings.registration.generate_one_time_password {
            tracing::warn!(
                environment = %environment,
                "New accounts share the configured default password; \
                 set registration.generate_one_time_password"
            );
        }

        settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;
        tracing::info!(
            access_token_expiration = %settings.jwt.access_token_expiration,
            refresh_token_expiration = %settings.jwt.refresh_token_expiration,
            "JWT configuration validated"
        );

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(settings.database.url.clone()).await?;
            tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
        }

        tracing::info!("Initializing database connection pool...");
        let pool = establish_async_connection_pool(&settings.database).await?;
        tracing::info!("Database connection pool initialized");

        let state = AppState::new(pool, settings);
        if let Err(e) = state.services.notifications.validate().await {
            tracing::warn!(
                provider = state.services.notifications.provider_name(),
                error = %e,
                "Notifier is misconfigured; welcome messages will fail"
            );
        }

        let router = create_router(state);
        tracing::info!("Router configured");

        let address = settings.server.address();
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
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed the failure is logged and that signal
/// is ignored; the other one still triggers shutdown.
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
