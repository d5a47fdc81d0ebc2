//! SPP Server - tuition management API for SMK Mekar Murni.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use spp_server as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use app::api::{self, AppState};
use app::config::{AppConfig, ConfigLoadResult};
use app::db;

/// Tuition (SPP) management API for students, classes, bills and payments.
#[derive(Parser)]
#[command(name = "spp-server")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, first_run) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => (AppConfig::default(), true),
        ConfigLoadResult::Invalid(e) => {
            anyhow::bail!("Config {} is invalid: {}", config_path.display(), e);
        }
    };

    let _guard = init_logging(config.logging.dir.as_deref());

    tracing::info!("SPP Server starting...");
    tracing::info!("Config path: {:?}", config_path);
    if first_run {
        config
            .save(&config_path)
            .with_context(|| format!("Failed to write default config to {}", config_path.display()))?;
        tracing::warn!("Config missing, wrote defaults. Change auth.jwt_secret before deploying");
    }

    let conn = db::connect(&config.database.connection_string())
        .await
        .context("Failed to connect to database")?;
    db::test_connection(&conn).await.context("Database is not responding")?;
    db::create_schema(&conn).await.context("Failed to create schema")?;
    db::seed_defaults(&conn, &config.auth).await.context("Failed to seed defaults")?;

    if let Ok(counts) = db::get_table_counts(&conn).await {
        tracing::info!(
            "Tables: {} students, {} classes, {} bills, {} payments",
            counts.students,
            counts.classes,
            counts.bills,
            counts.payments
        );
    }

    let bind_addr = config.server.bind_addr();
    let state = AppState::new(conn, config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Console logging, plus a daily rolling file when a log directory is configured.
fn init_logging(dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "spp-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
