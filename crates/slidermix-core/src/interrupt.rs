// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collaborators::InterruptBridge;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error};

/// Forwards Ctrl+C to a channel.
///
/// Every interrupt is offered with `try_send`; when the receiver already holds
/// an unread notification the extra one is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtrlCBridge;

impl InterruptBridge for CtrlCBridge {
    fn subscribe(&self) -> mpsc::Receiver<()> {
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    break;
                }

                match tx.try_send(()) {
                    Ok(()) | Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => {
                        debug!("Interrupt receiver dropped, no longer forwarding");
                        break;
                    }
                }
            }
        });

        rx
    }
}
