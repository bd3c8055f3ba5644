//! fij-server - Fixed-income journal web service
//!
//! Serves the journal UI and its JSON API from a single SQLite file. The
//! database is opened and its schema bootstrapped on the first request that
//! needs it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fij_common::config::{ConfigOverrides, JournalConfig};
use fij_common::db::JournalDb;
use fij_server::{build_router, AppState};
use tokio::signal;
use tracing::info;

/// Command-line arguments for fij-server
#[derive(Parser, Debug)]
#[command(name = "fij-server")]
#[command(about = "Fixed-income market observation journal")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/fi-journal/config.toml)
    #[arg(long, env = "FIJ_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding journal.db
    #[arg(short, long, env = "FIJ_DATA_FOLDER")]
    data_folder: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, env = "FIJ_BIND")]
    bind: Option<String>,

    /// Login password; unset or empty leaves the journal open
    #[arg(long, env = "APP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Mark the session cookie Secure (serve behind HTTPS)
    #[arg(long, env = "FIJ_SECURE_COOKIES", num_args = 0..=1, default_missing_value = "true")]
    secure_cookies: Option<bool>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_file: args.config,
            data_folder: args.data_folder,
            bind: args.bind,
            password: args.password,
            secure_cookies: args.secure_cookies,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    info!("Starting fi-journal (fij-server) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = JournalConfig::resolve(args.into()).context("Failed to load configuration")?;

    let db_path = config.database_path();
    info!("Data folder: {}", config.data_folder.display());
    info!("Database path: {}", db_path.display());

    if config.auth.is_enabled() {
        info!("Password authentication enabled");
    } else {
        info!("No password configured - authentication disabled");
    }

    let state = AppState::new(JournalDb::new(db_path), config.auth.clone(), config.secure_cookies);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
