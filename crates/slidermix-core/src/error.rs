// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::PathBuf;

/// Opaque error returned by collaborator factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The dependency whose construction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Notifier,
    Config,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Notifier => write!(f, "notifier"),
            Dependency::Config => write!(f, "config"),
        }
    }
}

/// Errors that abort orchestrator startup.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Failed to create {dependency}: {source}")]
    Construction {
        dependency: Dependency,
        #[source]
        source: BoxError,
    },

    #[error("Failed to load config during initialization: {0}")]
    ConfigLoad(#[source] ConfigError),

    #[error("Failed to set up tray: {0}")]
    TraySetup(#[source] TrayError),

    #[error("Orchestrator already started")]
    AlreadyStarted,
}

/// Errors reported by a config collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config watcher error: {0}")]
    Watch(String),
}

/// Errors reported by a tray collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("Tray setup failed: {0}")]
    Setup(String),

    #[error("Tray teardown failed: {0}")]
    Teardown(String),
}

/// Errors produced while resolving process settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
