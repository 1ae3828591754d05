//! jts-search - Job Title Search service
//!
//! Loads the occupational classification catalog at startup, then serves language-aware
//! job title search over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jts_common::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jts_search::loader::DataLoader;
use jts_search::AppState;

/// Command-line arguments; each overrides the matching config file / environment value
#[derive(Debug, Parser)]
#[command(name = "jts-search", version, about = "Job title search service")]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "JTS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (documents persist across restarts)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Skip the startup catalog load
    #[arg(long)]
    no_load: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.storage.database_path = Some(database);
    }
    if cli.no_load {
        config.data.loader_enabled = false;
    }
    config.validate().context("Invalid configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "jts-search (Job Title Search) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let store = jts_search::open_store(&config)
        .await
        .context("Failed to open document store")?;
    let service = Arc::new(jts_search::build_service(&config, store).context("Invalid search settings")?);

    // Catalog load completes before the listener binds
    let loader = DataLoader::new(Arc::clone(&service), &config.data);
    if let Some(report) = loader.run().await.context("Failed to load NOC data")? {
        info!(
            classifications = report.classifications,
            classification_titles = report.classification_titles,
            example_titles = report.example_titles,
            batches = report.batches.batches_attempted,
            failed_batches = report.batches.batches_failed,
            indexed = report.batches.entries_indexed,
            "Catalog load finished"
        );
    }

    let app = jts_search::build_router(AppState::new(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
