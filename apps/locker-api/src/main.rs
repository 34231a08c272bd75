//! # Locker API Server
//!
//! ```text
//! .env ──► ServerConfig ──► Database (migrate) ──► bootstrap admin
//!                                                        │
//!                                    session purge task ◄┤
//!                                                        ▼
//!                                         axum::serve ──► graceful shutdown
//! ```

use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use locker_api::auth::{bootstrap_admin, prepare_dummy_hash, SessionStore};
use locker_api::{router, AppState, ServerConfig};
use locker_db::{Database, DbConfig};

const DEFAULT_LOG_FILTER: &str = "info,locker=debug,sqlx=warn,tower_http=debug";

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Locker API server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        db_path = %config.db_path.display(),
        upload_dir = %config.upload_dir.display(),
        public_url = %config.public_url,
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db = Database::new(
        DbConfig::new(&config.db_path).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Database ready");

    let state = AppState::new(db.clone(), config.clone());
    state.photos.ensure_root().await?;

    prepare_dummy_hash().await?;
    if bootstrap_admin(&state).await? {
        warn!(
            username = %config.admin_username,
            "No users found; created the configured admin account. Change its password."
        );
    }

    tokio::spawn(purge_sessions(state.sessions.clone()));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Drops expired sessions on a fixed interval.
async fn purge_sessions(sessions: SessionStore) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let purged = sessions.purge_expired().await;
        if purged > 0 {
            info!(purged, "Expired sessions purged");
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install signal handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
