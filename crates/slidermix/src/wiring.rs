// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use slidermix_core::{
    BoxError, Collaborators, ConfigSource, CtrlCBridge, FileConfig, InterruptBridge, LogNotifier,
    Notifier, ProcessTerminator, Settings, StdProcessTerminator, Tray,
};

use crate::tray::ConsoleTray;

/// Production collaborators for the slidermix binary.
pub struct DefaultCollaborators {
    settings: Settings,
}

impl DefaultCollaborators {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Collaborators for DefaultCollaborators {
    fn notifier(&self) -> Result<Arc<dyn Notifier>, BoxError> {
        Ok(Arc::new(LogNotifier::new()))
    }

    fn config(&self, notifier: Arc<dyn Notifier>) -> Result<Arc<dyn ConfigSource>, BoxError> {
        if self.settings.config_path.is_dir() {
            return Err(format!(
                "config path {} is a directory",
                self.settings.config_path.display()
            )
            .into());
        }

        Ok(Arc::new(FileConfig::new(
            self.settings.config_path.clone(),
            self.settings.config_poll_interval,
            notifier,
        )))
    }

    fn tray(&self) -> Arc<dyn Tray> {
        Arc::new(ConsoleTray::new())
    }

    fn interrupt_bridge(&self) -> Arc<dyn InterruptBridge> {
        Arc::new(CtrlCBridge)
    }

    fn terminator(&self) -> Arc<dyn ProcessTerminator> {
        Arc::new(StdProcessTerminator)
    }
}
