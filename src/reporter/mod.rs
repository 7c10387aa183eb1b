//! Sensor reporter: pushes slot occupancy to the service on a fixed cadence.
//!
//! Every cycle the reporter samples each configured slot and pushes the
//! current status, on every tick and not only on change. The
//! service treats a repeated status as a successful no-op, so the loop doubles
//! as the reconciliation and retry mechanism: a push lost to a transport
//! failure is simply superseded one poll interval later.
//!
//! The physical read loop lives behind [`SensorSource`]; the reporter itself
//! only knows channels and booleans.

pub mod source;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ParkwatchError, Result};
use crate::model::SlotStatus;

pub use source::SensorSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    200
}

fn default_active_low() -> bool {
    true
}

/// One sensor-to-slot binding: which input channel reports which slot.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotBinding {
    pub channel: u8,
    pub name: String,
}

/// Reporter deployment configuration, loaded from a TOML file.
///
/// `server_url` is the service root (e.g. `http://192.168.1.10:8080/`).
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    pub server_url: Url,

    /// Milliseconds between full passes over all slots.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Settle delay between individual sensor reads within a pass.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// IR modules pull the input low when the beam is blocked; clear this for
    /// hardware with the opposite polarity.
    #[serde(default = "default_active_low")]
    pub active_low: bool,

    #[serde(default)]
    pub slots: Vec<SlotBinding>,
}

impl ReporterConfig {
    /// Load configuration from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            ParkwatchError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            ParkwatchError::config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }
}

/// The push loop over a [`SensorSource`].
pub struct SensorReporter<S> {
    config: ReporterConfig,
    source: S,
    client: reqwest::Client,
}

impl<S: SensorSource> SensorReporter<S> {
    pub fn new(config: ReporterConfig, source: S) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            source,
            client,
        })
    }

    /// Poll forever at the configured cadence.
    ///
    /// Transport failures and unknown-slot responses are logged and retried
    /// implicitly on the next tick; nothing here is fatal.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Sensor reporter started: {} slots, {}ms cycle, pushing to {}",
            self.config.slots.len(),
            self.config.poll_interval_ms,
            self.config.server_url
        );

        let mut ticker = interval(Duration::from_millis(self.config.poll_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// One full pass over the configured slots.
    pub async fn run_cycle(&self) {
        for binding in &self.config.slots {
            match self.source.read(binding.channel).await {
                Ok(level) => {
                    let occupied = if self.config.active_low { !level } else { level };
                    self.push_status(&binding.name, SlotStatus::from_reading(occupied))
                        .await;
                }
                Err(e) => {
                    warn!(
                        "Failed to read sensor channel {} for slot {:?}: {e}",
                        binding.channel, binding.name
                    );
                }
            }
            sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }
    }

    async fn push_status(&self, name: &str, status: SlotStatus) {
        match self.send_update(name, status).await {
            Ok(()) => debug!("Slot {name:?} reported as {status}"),
            // Unregistered slots are a deployment mismatch, not a reason to
            // stop polling; the reporter never auto-registers.
            Err(ParkwatchError::NotFound(msg)) => warn!("Server rejected update: {msg}"),
            Err(e) if e.is_retryable() => {
                warn!("Failed to push status for slot {name:?}, will retry next cycle: {e}");
            }
            Err(e) => warn!("Unexpected error pushing status for slot {name:?}: {e}"),
        }
    }

    /// Issue `GET /update` and map the response to the error taxonomy.
    async fn send_update(&self, name: &str, status: SlotStatus) -> Result<()> {
        let mut url = self
            .config
            .server_url
            .join("update")
            .map_err(|e| ParkwatchError::config(format!("Invalid server URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("slot", name)
            .append_pair("status", status.as_token());

        let response = self.client.get(url).send().await?;
        match response.status() {
            s if s.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => Err(ParkwatchError::not_found(format!(
                "slot {name:?} is not registered"
            ))),
            reqwest::StatusCode::BAD_REQUEST => Err(ParkwatchError::invalid_input(format!(
                "server rejected update for slot {name:?}"
            ))),
            s => Err(ParkwatchError::unavailable(format!(
                "unexpected status {s} from server"
            ))),
        }
    }
}
