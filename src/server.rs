//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database migrations, identifier generator setup
//! and the Axum server lifecycle.

use crate::application::services::EntryService;
use crate::config::Config;
use crate::domain::repositories::EntryRepository;
use crate::infrastructure::persistence::{InMemoryEntryRepository, PgEntryRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::id_generator::{Alphabet, IdGenerator};

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Identifier alphabet and generator
/// - PostgreSQL pool and migrations, or the in-memory store
/// - Route table
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - A route pattern fails to compile
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository: Arc<dyn EntryRepository> = match &config.database_url {
        Some(url) => {
            let pool = connect_pool(&config, url).await?;
            Arc::new(PgEntryRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("No database configured, entries are kept in memory only");
            Arc::new(InMemoryEntryRepository::new())
        }
    };

    let state = build_state(&config, repository);

    let app = app_router(state).context("Failed to build route table")?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the shared state: alphabet, generator and entry service.
pub fn build_state(config: &Config, repository: Arc<dyn EntryRepository>) -> AppState {
    let alphabet = Arc::new(Alphabet::from_kind(
        config.id_alphabet,
        config.id_alphabet_seed,
    ));
    tracing::debug!("Identifier alphabet: {}", alphabet.as_str());

    let generator = IdGenerator::new(alphabet);
    let entry_service = EntryService::new(repository, generator, config.id_max_attempts);

    AppState::new(Arc::new(entry_service))
}

/// Connects the PostgreSQL pool and applies embedded migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_pool(config: &Config, url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Resolves when Ctrl-C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
