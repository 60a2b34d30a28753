//! Occupancy dashboard - aggregation service for counting sensors
//!
//! Reads pre-aggregated people and vehicle counting records from the
//! document store and serves windowed summaries to the dashboard UI.
//!
//! Module structure:
//! - `domain/` - Core value types (records, window resolution)
//! - `services/` - Aggregation engine (people, vehicles, summary)
//! - `io/` - External interfaces (store client, HTTP endpoint)
//! - `infra/` - Infrastructure (config)

use clap::Parser;
use occupancy_dashboard::infra::Config;
use occupancy_dashboard::io::{start_dashboard_server, MongoStore};
use occupancy_dashboard::services::Dashboard;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Occupancy dashboard aggregation service
#[derive(Parser, Debug)]
#[command(name = "occupancy-dashboard", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE,
    /// then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for per-request visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("occupancy-dashboard starting");

    let args = Args::parse();
    let config_path = Config::resolve_config_path(args.config.as_deref());
    let config = Config::load_from_path(&config_path);

    info!(
        config_file = %config.config_file(),
        port = %config.port(),
        page_path = %config.page_path(),
        database = %config.store().database,
        designated_stream = %config.designated_stream(),
        "config_loaded"
    );

    // A failed connection leaves the store in degraded mode; the
    // service still serves requests and answers with the connection
    // failure.
    let store = Arc::new(MongoStore::connect(config.store()).await);
    let dashboard = Arc::new(Dashboard::new(store, &config));

    // Handle shutdown on Ctrl+C
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    start_dashboard_server(
        config.port(),
        dashboard,
        config.page_path().to_string(),
        shutdown_rx,
    )
    .await?;

    info!("occupancy-dashboard shutdown complete");
    Ok(())
}
