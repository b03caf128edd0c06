// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process::ExitCode;

use slidermix_core::{logger, Orchestrator, Settings, SettingsError};
use tracing_subscriber::EnvFilter;
use tracing::{debug, error, info};

mod tray;
mod wiring;

use wiring::DefaultCollaborators;

const FALLBACK_LOG_LEVEL: &str = "info";

#[tokio::main]
pub async fn main() -> ExitCode {
    let settings = Settings::from_env();
    let env_filter = log_filter(&settings);

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .event_format(logger::Formatter)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {e}");
    }

    debug!("Logging subsystem enabled");

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("Error resolving settings on startup: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        config_path = %settings.config_path.display(),
        mode = ?settings.run_mode(),
        "Starting slidermix"
    );

    let collaborators = DefaultCollaborators::new(settings.clone());

    let orchestrator = match Orchestrator::new(settings, &collaborators) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("Failed to create orchestrator: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = orchestrator.initialize().await {
        error!("Failed to initialize: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Filter for the resolved log level. Only a failed resolution falls back.
fn log_filter(settings: &Result<Settings, SettingsError>) -> EnvFilter {
    let log_level = settings
        .as_ref()
        .map_or(FALLBACK_LOG_LEVEL, |settings| settings.log_level.as_str());

    logger::env_filter(log_level)
        .or_else(|_| logger::env_filter(FALLBACK_LOG_LEVEL))
        .unwrap_or_default()
}
