// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::SettingsError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// When set to anything, the process runs without a tray icon.
pub const NO_TRAY_ICON_ENV: &str = "SLIDERMIX_NO_TRAY_ICON";
pub const CONFIG_PATH_ENV: &str = "SLIDERMIX_CONFIG_PATH";
pub const LOG_LEVEL_ENV: &str = "SLIDERMIX_LOG_LEVEL";
pub const CONFIG_POLL_MS_ENV: &str = "SLIDERMIX_CONFIG_POLL_MS";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CONFIG_POLL_MS: u64 = 500;
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How the orchestrator hands out control of the calling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No UI; the run loop runs on the calling task until an OS interrupt.
    Headless,
    /// The tray collaborator owns the calling task and invokes the run loop.
    Tray,
}

impl RunMode {
    /// Presence of the no-tray toggle selects headless mode. The toggle's value is ignored.
    #[must_use]
    pub fn from_no_tray_toggle(present: bool) -> Self {
        if present {
            RunMode::Headless
        } else {
            RunMode::Tray
        }
    }
}

/// Process settings, resolved once before any collaborator is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether the tray collaborator drives the run loop
    pub tray_enabled: bool,
    /// Path of the slider mapping file
    pub config_path: PathBuf,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
    /// How often the mapping file is checked for changes
    pub config_poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tray_enabled: true,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            config_poll_interval: Duration::from_millis(DEFAULT_CONFIG_POLL_MS),
        }
    }
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        let tray_enabled = env::var_os(NO_TRAY_ICON_ENV).is_none();
        let config_path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let log_level = env::var(LOG_LEVEL_ENV)
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        let config_poll_interval = match env::var(CONFIG_POLL_MS_ENV) {
            Ok(val) => {
                let millis = val.trim().parse::<u64>().map_err(|_| {
                    SettingsError::Invalid(format!(
                        "{CONFIG_POLL_MS_ENV} must be a number of milliseconds, got '{val}'"
                    ))
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => Duration::from_millis(DEFAULT_CONFIG_POLL_MS),
        };

        let settings = Self {
            tray_enabled,
            config_path,
            log_level,
            config_poll_interval,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.config_path.as_os_str().is_empty() {
            return Err(SettingsError::Invalid(
                "Config path cannot be empty".to_string(),
            ));
        }

        if self.config_poll_interval.is_zero() {
            return Err(SettingsError::Invalid(
                "Config poll interval must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_no_tray_toggle(!self.tray_enabled)
    }
}
