//! Parkwatch Sensor Reporter
//!
//! Samples slot sensors and pushes their status to the server on a fixed
//! cycle.
//!
//! The sensor hardware is reached through a [`SensorSource`]; by default this
//! binary runs with a file-backed source so a deployment can be smoke-tested
//! before the GPIO adapter is wired in.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use parkwatch::reporter::source::{LevelFileSource, SensorSource, StaticSource};
use parkwatch::reporter::{ReporterConfig, SensorReporter};
use parkwatch::Result;

/// Parkwatch reporter configuration
#[derive(Parser, Debug)]
#[command(name = "parkwatch-reporter")]
#[command(about = "Sensor reporter for the parkwatch service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Config {
    /// Reporter configuration file (TOML)
    #[arg(long, default_value = "reporter.toml", env = "PARKWATCH_REPORTER_CONFIG")]
    config: PathBuf,

    /// Override the server base URL from the configuration file
    #[arg(long, env = "PARKWATCH_SERVER_URL")]
    server_url: Option<Url>,

    /// JSON file holding raw channel levels, e.g. {"29": false}
    #[arg(long)]
    levels_file: Option<PathBuf>,

    /// Run a single pass over all slots and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Config {
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
    let args = Config::parse();
    args.initialize_logging();

    let mut config = ReporterConfig::load(&args.config).await?;
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    if config.slots.is_empty() {
        warn!("No slot bindings configured, nothing to report");
    }
    for binding in &config.slots {
        info!("Channel {} reports slot {:?}", binding.channel, binding.name);
    }

    let source: Box<dyn SensorSource> = match args.levels_file {
        Some(path) => {
            info!("Reading channel levels from {}", path.display());
            Box::new(LevelFileSource::new(path))
        }
        None => {
            // Dry-run source: every configured channel idles at the released
            // level, so all slots report free.
            warn!("No levels file given, using a fixed all-released source");
            let channels = config.slots.iter().map(|b| b.channel);
            Box::new(StaticSource::uniform(channels, config.active_low))
        }
    };

    let reporter = SensorReporter::new(config, source)?;

    if args.once {
        reporter.run_cycle().await;
        info!("Single pass complete");
        return Ok(());
    }

    reporter.run().await
}
