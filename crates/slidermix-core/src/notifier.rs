// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collaborators::Notifier;
use tracing::warn;

/// Notifier that reports alerts through the log instead of a desktop toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        warn!(title, "{}", message);
    }
}
