// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Interfaces the orchestrator consumes.
//!
//! Each collaborator owns its own internals; the orchestrator only sequences
//! calls into them.

use crate::error::{BoxError, ConfigError, TrayError};
use crate::orchestrator::RunLoop;
use crate::stop::StopHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Surfaces user-visible alerts.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Loads the mapping configuration and keeps it fresh.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Loads the configuration for the first time.
    fn load(&self) -> Result<(), ConfigError>;

    /// Watches the configuration file until [`ConfigSource::stop_watching_config_file`] is called.
    async fn watch_config_file_changes(&self);

    /// Asks the watch loop to exit. Must return promptly and be idempotent.
    fn stop_watching_config_file(&self) -> Result<(), ConfigError>;
}

/// Platform tray UI.
///
/// After `initialize_tray` is called the tray owns the calling task. It runs
/// its own setup, then invokes `run` when it is ready.
#[async_trait]
pub trait Tray: Send + Sync {
    async fn initialize_tray(&self, run: RunLoop, stop: StopHandle) -> Result<(), TrayError>;

    /// Tears the tray down. A no-op when the tray was never initialized.
    fn stop_tray(&self) -> Result<(), TrayError>;
}

/// Delivers OS interrupt notifications.
pub trait InterruptBridge: Send + Sync {
    fn subscribe(&self) -> mpsc::Receiver<()>;
}

/// Status reported when the process terminates after a graceful stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
}

impl ExitStatus {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
        }
    }
}

/// Ends the process once shutdown has completed.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, status: ExitStatus);
}

/// Exits the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdProcessTerminator;

impl ProcessTerminator for StdProcessTerminator {
    fn terminate(&self, status: ExitStatus) {
        std::process::exit(status.code());
    }
}

/// Builds every collaborator the orchestrator needs.
///
/// `notifier` and `config` may fail; the orchestrator is never assembled when
/// either does.
pub trait Collaborators {
    fn notifier(&self) -> Result<Arc<dyn Notifier>, BoxError>;

    fn config(&self, notifier: Arc<dyn Notifier>) -> Result<Arc<dyn ConfigSource>, BoxError>;

    fn tray(&self) -> Arc<dyn Tray>;

    fn interrupt_bridge(&self) -> Arc<dyn InterruptBridge>;

    fn terminator(&self) -> Arc<dyn ProcessTerminator>;
}
