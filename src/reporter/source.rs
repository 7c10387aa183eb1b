//! Sensor input sources.
//!
//! The GPIO read loop is deployment hardware; the reporter sees it through
//! [`SensorSource`]. The implementations here cover tests and wiring checks;
//! a real installation plugs its own adapter into the same trait.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ParkwatchError, Result};

/// One binary input per channel.
///
/// `read` returns the raw electrical level; polarity is applied by the
/// reporter according to its `active_low` setting.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn read(&self, channel: u8) -> Result<bool>;
}

#[async_trait]
impl SensorSource for Box<dyn SensorSource> {
    async fn read(&self, channel: u8) -> Result<bool> {
        (**self).read(channel).await
    }
}

/// In-memory source with settable levels.
pub struct StaticSource {
    levels: RwLock<HashMap<u8, bool>>,
}

impl StaticSource {
    pub fn new(levels: HashMap<u8, bool>) -> Self {
        Self {
            levels: RwLock::new(levels),
        }
    }

    /// All listed channels at the given level.
    pub fn uniform(channels: impl IntoIterator<Item = u8>, level: bool) -> Self {
        Self::new(channels.into_iter().map(|c| (c, level)).collect())
    }

    pub async fn set(&self, channel: u8, level: bool) {
        self.levels.write().await.insert(channel, level);
    }
}

#[async_trait]
impl SensorSource for StaticSource {
    async fn read(&self, channel: u8) -> Result<bool> {
        self.levels
            .read()
            .await
            .get(&channel)
            .copied()
            .ok_or_else(|| {
                ParkwatchError::config(format!("No level configured for channel {channel}"))
            })
    }
}

/// Source backed by a JSON file mapping channel numbers to levels, e.g.
/// `{"29": false, "31": true}`.
///
/// The file is re-read on every sample, so an external process (or a hand
/// edit) drives the levels. Useful for bring-up before the hardware adapter
/// exists.
pub struct LevelFileSource {
    path: PathBuf,
}

impl LevelFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SensorSource for LevelFileSource {
    async fn read(&self, channel: u8) -> Result<bool> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let levels: HashMap<String, bool> = serde_json::from_str(&contents).map_err(|e| {
            ParkwatchError::config(format!("Failed to parse {}: {e}", self.path.display()))
        })?;
        levels.get(&channel.to_string()).copied().ok_or_else(|| {
            ParkwatchError::config(format!(
                "No level for channel {channel} in {}",
                self.path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn static_source_reads_and_updates() {
        let source = StaticSource::uniform([29, 31], true);

        assert!(source.read(29).await.unwrap());
        source.set(29, false).await;
        assert!(!source.read(29).await.unwrap());

        assert!(source.read(7).await.is_err());
    }

    #[tokio::test]
    async fn level_file_source_tracks_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        std::fs::write(&path, r#"{"29": false, "31": true}"#).unwrap();

        let source = LevelFileSource::new(path.clone());
        assert!(!source.read(29).await.unwrap());
        assert!(source.read(31).await.unwrap());

        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"29": true}}"#).unwrap();
        assert!(source.read(29).await.unwrap());
        assert!(source.read(31).await.is_err());
    }
}
