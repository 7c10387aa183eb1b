//! Parkwatch Server - Main Entry Point
//!
//! Serves the slot API over HTTP, backed by the SQLite slot store.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parkwatch::http;
use parkwatch::service::SlotService;
use parkwatch::storage::SqliteSlotStore;
use parkwatch::Result;

/// Parkwatch server configuration
#[derive(Parser, Debug)]
#[command(name = "parkwatch-server")]
#[command(about = "Parking-slot occupancy service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Config {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "PARKWATCH_BIND")]
    bind: String,

    /// SQLite database path or URL
    #[arg(long, default_value = "parking.db", env = "PARKWATCH_DATABASE")]
    database: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Config {
    /// Initialize logging based on debug flag
    fn initialize_logging(&self) {
        let filter = if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.initialize_logging();

    info!("Starting parkwatch-server {}", env!("CARGO_PKG_VERSION"));

    let store = SqliteSlotStore::connect(&config.database).await?;
    let service = SlotService::new(Arc::new(store));

    http::serve(&config.bind, service).await
}
