// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use slidermix_core::{RunLoop, StopHandle, StopReason, Tray, TrayError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// Stand-in tray for environments without a platform tray UI.
///
/// Setup only announces readiness. Ctrl+C plays the role of the tray's quit
/// menu item.
#[derive(Debug, Default)]
pub struct ConsoleTray {
    ready: AtomicBool,
    stopped: AtomicBool,
}

impl ConsoleTray {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Tray for ConsoleTray {
    async fn initialize_tray(&self, run: RunLoop, stop: StopHandle) -> Result<(), TrayError> {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Quit requested from tray");
                    stop.signal_stop(StopReason::TrayQuit);
                }
                Err(e) => error!("Failed to listen for tray quit: {}", e),
            }
        });

        self.ready.store(true, Ordering::Release);
        info!("Tray ready, press Ctrl+C to quit");

        if let Err(e) = run.run().await {
            error!("Run loop failed: {}", e);
        }

        Ok(())
    }

    fn stop_tray(&self) -> Result<(), TrayError> {
        if !self.ready.load(Ordering::Acquire) {
            debug!("Tray was never initialized, nothing to stop");
            return Ok(());
        }

        if self.stopped.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        info!("Tray stopped");
        Ok(())
    }
}
