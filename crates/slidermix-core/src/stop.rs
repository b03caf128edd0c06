// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One-shot stop signal shared by the run loop and every task that may end it.
//!
//! The signal is set at most once. Setting it never waits on a receiver, so
//! late signalers (a tray quit arriving after an interrupt, for example) return
//! immediately instead of blocking on a consumer that has already gone away.

use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why the stop signal was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// OS interrupt (Ctrl+C) in headless mode
    Interrupt,
    /// Quit action from the tray
    TrayQuit,
    /// Any other caller
    Requested,
}

#[derive(Debug, Default)]
struct Inner {
    token: CancellationToken,
    reason: OnceLock<StopReason>,
}

/// Broadcast-once stop primitive observed by the run loop.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal. Returns `true` only for the call that performed the transition.
    pub fn signal(&self, reason: StopReason) -> bool {
        if self.inner.reason.set(reason).is_err() {
            debug!(?reason, "Stop already signalled, ignoring");
            return false;
        }

        debug!(?reason, "Signalling stop");
        self.inner.token.cancel();
        true
    }

    #[must_use]
    pub fn is_signaled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// The reason recorded by the first signal, if any.
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        self.inner.reason.get().copied()
    }

    /// Completes once the signal has been raised.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await;
    }

    #[must_use]
    pub fn handle(&self) -> StopHandle {
        StopHandle {
            signal: self.clone(),
        }
    }
}

/// Cloneable capability handed to collaborators that may end the process.
#[derive(Debug, Clone)]
pub struct StopHandle {
    signal: StopSignal,
}

impl StopHandle {
    /// Request a stop. Never blocks; only the first request has an effect.
    pub fn signal_stop(&self, reason: StopReason) -> bool {
        self.signal.signal(reason)
    }

    #[must_use]
    pub fn is_stop_signaled(&self) -> bool {
        self.signal.is_signaled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_is_one_shot() {
        let signal = StopSignal::new();
        assert!(!signal.is_signaled());
        assert_eq!(signal.reason(), None);

        assert!(signal.signal(StopReason::TrayQuit));
        assert!(!signal.signal(StopReason::Interrupt));
        assert!(!signal.signal(StopReason::Requested));

        assert!(signal.is_signaled());
        assert_eq!(signal.reason(), Some(StopReason::TrayQuit));
    }

    #[tokio::test]
    async fn test_waiters_observe_signal() {
        let signal = StopSignal::new();
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.cancelled().await })
            })
            .collect();

        signal.handle().signal_stop(StopReason::Requested);

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter should wake")
                .expect("waiter should not panic");
        }
    }

    #[tokio::test]
    async fn test_late_waiter_does_not_block() {
        let signal = StopSignal::new();
        signal.signal(StopReason::Interrupt);

        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("already signalled waiter should complete immediately");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signalers_transition_once() {
        let signal = StopSignal::new();
        let callers: Vec<_> = (0..64)
            .map(|_| {
                let handle = signal.handle();
                tokio::spawn(async move { handle.signal_stop(StopReason::Requested) })
            })
            .collect();

        let mut transitions = 0;
        for caller in callers {
            if caller.await.expect("caller should not panic") {
                transitions += 1;
            }
        }

        assert_eq!(transitions, 1);
        assert!(signal.handle().is_stop_signaled());
    }
}
