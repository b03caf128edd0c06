// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! YAML file-backed slider mapping with hot reload.
//!
//! # Example Configuration
//!
//! ```yaml
//! slider_mapping:
//!   0: master
//!   1: [chrome.exe, firefox.exe]
//!   2: discord.exe
//! invert_sliders: false
//! com_port: COM4
//! baud_rate: 9600
//! noise_reduction: default
//! ```
//!
//! The mapping is stored and republished on change; interpreting it is left to
//! the device side.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::collaborators::{ConfigSource, Notifier};
use crate::error::ConfigError;

const DEFAULT_COM_PORT: &str = "COM4";
const DEFAULT_BAUD_RATE: u32 = 9600;
const DEFAULT_NOISE_REDUCTION: &str = "default";

/// Slider-to-target assignments read from the mapping file.
#[derive(Debug, PartialEq, Eq, Deserialize, Clone)]
#[serde(default)]
pub struct MappingConfig {
    /// Slider index to the names of the targets it drives
    #[serde(deserialize_with = "deserialize_slider_mapping")]
    pub slider_mapping: HashMap<u8, Vec<String>>,
    pub invert_sliders: bool,
    pub com_port: String,
    pub baud_rate: u32,
    pub noise_reduction: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            slider_mapping: HashMap::new(),
            invert_sliders: false,
            com_port: DEFAULT_COM_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            noise_reduction: DEFAULT_NOISE_REDUCTION.to_string(),
        }
    }
}

impl MappingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.com_port.trim().is_empty() {
            return Err(ConfigError::Invalid("com_port cannot be empty".to_string()));
        }

        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid(
                "baud_rate must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// A slider may map to a single target or to a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Targets {
    One(String),
    Many(Vec<String>),
}

fn deserialize_slider_mapping<'de, D>(deserializer: D) -> Result<HashMap<u8, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Targets>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(slider, targets)| {
            let slider = slider.trim().parse::<u8>().map_err(|_| {
                serde::de::Error::custom(format!("invalid slider index '{slider}'"))
            })?;
            let targets = match targets {
                Targets::One(target) => vec![target],
                Targets::Many(targets) => targets,
            };
            Ok((slider, targets))
        })
        .collect()
}

/// Identifies a version of the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

fn fingerprint(path: &Path) -> Option<Fingerprint> {
    let metadata = fs::metadata(path).ok()?;
    Some(Fingerprint {
        modified: metadata.modified().ok()?,
        len: metadata.len(),
    })
}

fn read_mapping(path: &Path) -> Result<MappingConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let mapping = Figment::new()
        .merge(Yaml::file(path))
        .extract::<MappingConfig>()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    mapping.validate()?;
    Ok(mapping)
}

/// Mapping config backed by a YAML file on disk.
pub struct FileConfig {
    path: PathBuf,
    poll_interval: Duration,
    notifier: Arc<dyn Notifier>,
    current: watch::Sender<Arc<MappingConfig>>,
    /// Version of the file that `current` was read from
    loaded_from: Mutex<Option<Fingerprint>>,
    stop_token: CancellationToken,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration, notifier: Arc<dyn Notifier>) -> Self {
        let (current, _) = watch::channel(Arc::new(MappingConfig::default()));
        Self {
            path: path.into(),
            poll_interval,
            notifier,
            current,
            loaded_from: Mutex::new(None),
            stop_token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently loaded mapping.
    #[must_use]
    pub fn current(&self) -> Arc<MappingConfig> {
        Arc::clone(&self.current.borrow())
    }

    /// Receiver notified every time a new mapping is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<MappingConfig>> {
        self.current.subscribe()
    }

    /// Reads the file and publishes it. The fingerprint is taken before the
    /// read so an edit racing the read is picked up by the next poll.
    fn read_and_publish(&self) -> Result<usize, ConfigError> {
        let seen = fingerprint(&self.path);
        let mapping = read_mapping(&self.path)?;
        let sliders = mapping.slider_mapping.len();
        self.current.send_replace(Arc::new(mapping));
        *self.loaded_from.lock().unwrap_or_else(PoisonError::into_inner) = seen;
        Ok(sliders)
    }

    fn loaded_fingerprint(&self) -> Option<Fingerprint> {
        *self.loaded_from.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reload(&self) {
        match self.read_and_publish() {
            Ok(sliders) => {
                info!(path = %self.path.display(), sliders, "Reloaded config");
            }
            Err(e) => {
                warn!("Failed to reload config, keeping previous mapping: {}", e);
                self.notifier.notify(
                    "Failed to reload configuration",
                    &format!("{e}. The previous mapping stays in effect."),
                );
            }
        }
    }
}

#[async_trait]
impl ConfigSource for FileConfig {
    fn load(&self) -> Result<(), ConfigError> {
        debug!(path = %self.path.display(), "Loading config");

        match self.read_and_publish() {
            Ok(sliders) => {
                info!(path = %self.path.display(), sliders, "Loaded config");
                Ok(())
            }
            Err(e) => {
                error!("Failed to load config: {}", e);
                self.notifier
                    .notify("Failed to load configuration", &e.to_string());
                Err(e)
            }
        }
    }

    async fn watch_config_file_changes(&self) {
        debug!(path = %self.path.display(), "Watching config file for changes");

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Compare against the version that was loaded, not the one on disk now,
        // so edits made before the watcher started are still applied.
        let mut last_seen = self.loaded_fingerprint();

        loop {
            tokio::select! {
                biased;
                () = self.stop_token.cancelled() => {
                    debug!("Stopped watching config file");
                    break;
                }
                _ = ticker.tick() => {
                    let seen = fingerprint(&self.path);
                    if seen == last_seen {
                        continue;
                    }
                    last_seen = seen;

                    if seen.is_none() {
                        warn!(path = %self.path.display(), "Config file disappeared, keeping previous mapping");
                        continue;
                    }

                    debug!("Config file changed, reloading");
                    self.reload();
                }
            }
        }
    }

    fn stop_watching_config_file(&self) -> Result<(), ConfigError> {
        debug!("Signalling config watcher to stop");
        self.stop_token.cancel();
        Ok(())
    }
}
