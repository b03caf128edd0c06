// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! # slidermix core
//!
//! Lifecycle orchestration for the background process that bridges a slider
//! control box to the desktop.
//!
//! ## Architecture
//!
//! - [`orchestrator`]: startup ordering, run-mode selection, single-shot shutdown
//! - [`stop`]: the one-shot stop signal
//! - [`collaborators`]: interfaces for the notifier, config, tray and interrupt bridge
//! - [`file_config`]: YAML mapping file with hot reload
//! - [`settings`]: environment-driven process settings
//!
//! ## Usage
//!
//! ```rust,ignore
//! let settings = Settings::from_env()?;
//! let orchestrator = Orchestrator::new(settings, &collaborators)?;
//! orchestrator.initialize().await?;
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod collaborators;
pub mod error;
pub mod file_config;
pub mod interrupt;
pub mod logger;
pub mod notifier;
pub mod orchestrator;
pub mod settings;
pub mod stop;

pub use collaborators::{
    Collaborators, ConfigSource, ExitStatus, InterruptBridge, Notifier, ProcessTerminator,
    StdProcessTerminator, Tray,
};
pub use error::{BoxError, ConfigError, Dependency, OrchestratorError, SettingsError, TrayError};
pub use file_config::{FileConfig, MappingConfig};
pub use interrupt::CtrlCBridge;
pub use notifier::LogNotifier;
pub use orchestrator::{LifecycleState, Orchestrator, RunLoop};
pub use settings::{RunMode, Settings};
pub use stop::{StopHandle, StopReason, StopSignal};
