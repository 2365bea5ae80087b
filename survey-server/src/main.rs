//! survey-server - Survey response collector
//!
//! Serves the survey form, stores submitted responses and exports them
//! as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use survey_common::config::{ConfigOverrides, ServiceConfig, StorageBackend};
use survey_server::store::open_store;
use survey_server::{build_router, AppState};

/// Command-line arguments for survey-server
#[derive(Parser, Debug)]
#[command(name = "survey-server")]
#[command(about = "Collects survey responses and exports them as CSV")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/survey/config.toml)
    #[arg(short, long, env = "SURVEY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SURVEY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Storage backend: sqlite, file or memory
    #[arg(short, long, env = "SURVEY_STORAGE")]
    storage: Option<StorageBackend>,

    /// SQLite database file (sqlite backend)
    #[arg(long, env = "SURVEY_DATABASE")]
    database: Option<PathBuf>,

    /// JSON-lines response file (file backend)
    #[arg(long, env = "SURVEY_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Folder with the survey form's static files
    #[arg(long, env = "SURVEY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "SURVEY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_file: args.config,
            host: args.host,
            port: args.port,
            storage: args.storage,
            database_path: args.database,
            data_file: args.data_file,
            static_dir: args.static_dir,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so the configured level can apply
    let config = ServiceConfig::resolve(args.into()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "survey_server={0},survey_common={0},tower_http={0}",
                config.log_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting survey-server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Storage backend: {} ({})",
        config.storage.backend,
        config.storage.location()
    );
    info!("Static files: {}", config.static_dir.display());

    let store = match open_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => {
            error!("Storage connection failed: {}", e);
            return Err(e).context("Failed to open response storage");
        }
    };

    let state = AppState::new(store.clone(), config.static_dir.clone());
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Survey app listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await.context("Failed to close response storage")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
