// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Orchestrator Implementation
//!
//! The orchestrator owns startup ordering, run-mode selection and the single
//! shutdown sequence of the process.
//!
//! ## Lifecycle Stages
//!
//! 1. **Created** (`new()`): notifier and config collaborators are built
//! 2. **Initialized** (`initialize()`): config loaded, run mode chosen
//! 3. **Running**: config watcher started, waiting on the stop signal
//! 4. **Stopping**: config watcher and tray are told to stop
//! 5. **Terminated**: the process terminator has been invoked

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Instrument};

use crate::{
    collaborators::{
        Collaborators, ConfigSource, ExitStatus, InterruptBridge, Notifier, ProcessTerminator,
        Tray,
    },
    error::{Dependency, OrchestratorError},
    settings::{RunMode, Settings},
    stop::{StopHandle, StopReason, StopSignal},
};

/// Lifecycle state of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initialized,
    Running,
    Stopping,
    Terminated,
}

/// Central coordinator of the background process.
pub struct Orchestrator {
    settings: Settings,

    /// Shared with the config collaborator, which reports load failures through it.
    notifier: Arc<dyn Notifier>,

    /// Never replaced; the collaborator reloads itself. Only the watch task and
    /// the orchestrator touch it.
    config: Arc<dyn ConfigSource>,

    tray: Arc<dyn Tray>,
    interrupts: Arc<dyn InterruptBridge>,
    terminator: Arc<dyn ProcessTerminator>,

    stop: StopSignal,
    state: watch::Sender<LifecycleState>,

    initialized: AtomicBool,
    run_started: AtomicBool,
    shutdown_started: AtomicBool,
}

impl Orchestrator {
    /// Builds the notifier, then the config collaborator, then the orchestrator itself.
    pub fn new<C>(settings: Settings, collaborators: &C) -> Result<Arc<Self>, OrchestratorError>
    where
        C: Collaborators + ?Sized,
    {
        let notifier = collaborators.notifier().map_err(|e| {
            error!("Failed to create notifier: {}", e);
            OrchestratorError::Construction {
                dependency: Dependency::Notifier,
                source: e,
            }
        })?;

        let config = collaborators
            .config(Arc::clone(&notifier))
            .map_err(|e| {
                error!("Failed to create config: {}", e);
                OrchestratorError::Construction {
                    dependency: Dependency::Config,
                    source: e,
                }
            })?;

        let (state, _) = watch::channel(LifecycleState::Created);

        let orchestrator = Arc::new(Self {
            settings,
            notifier,
            config,
            tray: collaborators.tray(),
            interrupts: collaborators.interrupt_bridge(),
            terminator: collaborators.terminator(),
            stop: StopSignal::new(),
            state,
            initialized: AtomicBool::new(false),
            run_started: AtomicBool::new(false),
            shutdown_started: AtomicBool::new(false),
        });

        debug!("Created orchestrator");

        Ok(orchestrator)
    }

    /// Loads the config and hands control to the selected run mode.
    ///
    /// In headless mode this returns once the run loop has finished. In tray
    /// mode it returns when the tray gives the calling task back.
    pub async fn initialize(self: &Arc<Self>) -> Result<(), OrchestratorError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            warn!("Initialize called more than once, ignoring");
            return Err(OrchestratorError::AlreadyStarted);
        }

        debug!("Initializing");

        if let Err(e) = self.config.load() {
            error!("Failed to load config during initialization: {}", e);
            return Err(OrchestratorError::ConfigLoad(e));
        }

        self.set_state(LifecycleState::Initialized);

        match self.settings.run_mode() {
            RunMode::Headless => {
                debug!(reason = "toggle set", "Running without tray icon");
                self.forward_interrupts();
                self.run_loop().run().await
            }
            RunMode::Tray => {
                debug!("Handing run loop to tray");
                self.tray
                    .initialize_tray(self.run_loop(), self.stop.handle())
                    .await
                    .map_err(|e| {
                        error!("Failed to set up tray: {}", e);
                        OrchestratorError::TraySetup(e)
                    })
            }
        }
    }

    /// Capability to end the run loop from any task.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.handle()
    }

    #[must_use]
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Receiver for lifecycle state updates.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn run_loop(self: &Arc<Self>) -> RunLoop {
        RunLoop {
            orchestrator: Arc::clone(self),
        }
    }

    fn forward_interrupts(&self) {
        let mut interrupts = self.interrupts.subscribe();
        let stop = self.stop.handle();

        tokio::spawn(async move {
            if interrupts.recv().await.is_some() {
                warn!("Interrupted");
                stop.signal_stop(StopReason::Interrupt);
            } else {
                debug!("Interrupt source closed without firing");
            }
        }
        .in_current_span());
    }

    async fn run(&self) -> Result<(), OrchestratorError> {
        if self.run_started.swap(true, Ordering::AcqRel) {
            warn!("Run loop already started, ignoring");
            return Err(OrchestratorError::AlreadyStarted);
        }

        info!("Run loop starting");
        self.set_state(LifecycleState::Running);

        let config = Arc::clone(&self.config);
        tokio::spawn(
            async move {
                config.watch_config_file_changes().await;
                debug!("Config watcher exited");
            }
            .in_current_span(),
        );

        self.stop.cancelled().await;
        debug!(reason = ?self.stop.reason(), "Stop signal observed, terminating");

        self.shutdown();

        self.set_state(LifecycleState::Terminated);
        self.terminator.terminate(ExitStatus::Success);

        Ok(())
    }

    /// Best-effort: each step runs even if the previous one failed.
    fn shutdown(&self) {
        if self.shutdown_started.swap(true, Ordering::AcqRel) {
            debug!("Shutdown already performed");
            return;
        }

        info!("Stopping");
        self.set_state(LifecycleState::Stopping);

        if let Err(e) = self.config.stop_watching_config_file() {
            error!("Failed to stop watching config file: {}", e);
        }

        if let Err(e) = self.tray.stop_tray() {
            error!("Failed to stop tray: {}", e);
        }
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.send_replace(state);
    }
}

/// The run loop, handed to whoever owns the calling task.
///
/// Running it starts the config watcher, waits for the stop signal, performs
/// shutdown and terminates the process.
pub struct RunLoop {
    orchestrator: Arc<Orchestrator>,
}

impl RunLoop {
    pub async fn run(self) -> Result<(), OrchestratorError> {
        self.orchestrator.run().await
    }
}

impl std::fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLoop")
            .field("state", &self.orchestrator.state())
            .finish()
    }
}
