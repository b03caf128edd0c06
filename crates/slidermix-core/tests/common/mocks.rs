// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock collaborators that record every call the orchestrator makes

#![allow(dead_code)]

use async_trait::async_trait;
use slidermix_core::{
    BoxError, Collaborators, ConfigError, ConfigSource, ExitStatus, InterruptBridge, Notifier,
    ProcessTerminator, RunLoop, StopHandle, StopReason, Tray, TrayError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn record(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| **c == call).count()
    }
}

pub struct MockNotifier;

impl Notifier for MockNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// Config whose watch loop parks until it is told to stop.
pub struct MockConfig {
    log: CallLog,
    fail_load: bool,
    fail_stop: bool,
    token: CancellationToken,
}

#[async_trait]
impl ConfigSource for MockConfig {
    fn load(&self) -> Result<(), ConfigError> {
        self.log.record("load");
        if self.fail_load {
            return Err(ConfigError::Parse("mapping is not a map".to_string()));
        }
        Ok(())
    }

    async fn watch_config_file_changes(&self) {
        self.log.record("watch");
        self.token.cancelled().await;
        self.log.record("watch_exit");
    }

    fn stop_watching_config_file(&self) -> Result<(), ConfigError> {
        self.log.record("stop_watch");
        self.token.cancel();
        if self.fail_stop {
            return Err(ConfigError::Watch("watcher already gone".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayBehavior {
    /// Runs the run loop and quits from the tray shortly after it starts
    QuitAfterRun,
    /// Runs the run loop and waits for someone else to stop it
    RunOnly,
    /// Fails before the run loop is ever invoked
    FailSetup,
}

pub struct MockTray {
    log: CallLog,
    behavior: TrayBehavior,
    fail_stop: bool,
    pub run_result: Mutex<Option<Result<(), String>>>,
}

#[async_trait]
impl Tray for MockTray {
    async fn initialize_tray(&self, run: RunLoop, stop: StopHandle) -> Result<(), TrayError> {
        self.log.record("init_tray");

        if self.behavior == TrayBehavior::FailSetup {
            return Err(TrayError::Setup("no system tray available".to_string()));
        }

        if self.behavior == TrayBehavior::QuitAfterRun {
            let log = self.log.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.record("tray_quit");
                stop.signal_stop(StopReason::TrayQuit);
            });
        }

        let result = run.run().await.map_err(|e| e.to_string());
        *self.run_result.lock().unwrap() = Some(result);
        Ok(())
    }

    fn stop_tray(&self) -> Result<(), TrayError> {
        self.log.record("stop_tray");
        if self.fail_stop {
            return Err(TrayError::Teardown("icon handle lost".to_string()));
        }
        Ok(())
    }
}

/// Interrupt bridge fired by the test.
#[derive(Default)]
pub struct MockInterrupts {
    sender: Mutex<Option<mpsc::Sender<()>>>,
    subscriptions: AtomicUsize,
}

impl MockInterrupts {
    pub fn fire(&self) {
        if let Some(sender) = self.sender.lock().unwrap().as_ref() {
            let _ = sender.try_send(());
        }
    }

    /// Drops the sender so the subscriber sees the source end without firing.
    pub fn close(&self) {
        self.sender.lock().unwrap().take();
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

impl InterruptBridge for MockInterrupts {
    fn subscribe(&self) -> mpsc::Receiver<()> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(1);
        *self.sender.lock().unwrap() = Some(tx);
        rx
    }
}

/// Terminator that records exit statuses instead of exiting.
#[derive(Default)]
pub struct RecordingTerminator {
    log: CallLog,
    statuses: Mutex<Vec<ExitStatus>>,
}

impl RecordingTerminator {
    pub fn statuses(&self) -> Vec<ExitStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

impl ProcessTerminator for RecordingTerminator {
    fn terminate(&self, status: ExitStatus) {
        self.log.record("terminate");
        self.statuses.lock().unwrap().push(status);
    }
}

/// Factory handing out the mocks above, with knobs for each failure mode.
pub struct MockCollaborators {
    pub log: CallLog,
    pub fail_notifier: bool,
    pub fail_config: bool,
    pub fail_load: bool,
    pub fail_stop_watch: bool,
    pub fail_stop_tray: bool,
    pub tray_behavior: TrayBehavior,
    pub tray: Mutex<Option<Arc<MockTray>>>,
    pub interrupts: Arc<MockInterrupts>,
    pub terminator: Arc<RecordingTerminator>,
}

impl Default for MockCollaborators {
    fn default() -> Self {
        let log = CallLog::default();
        Self {
            terminator: Arc::new(RecordingTerminator {
                log: log.clone(),
                statuses: Mutex::default(),
            }),
            log,
            fail_notifier: false,
            fail_config: false,
            fail_load: false,
            fail_stop_watch: false,
            fail_stop_tray: false,
            tray_behavior: TrayBehavior::QuitAfterRun,
            tray: Mutex::default(),
            interrupts: Arc::default(),
        }
    }
}

impl MockCollaborators {
    pub fn tray_handle(&self) -> Arc<MockTray> {
        Arc::clone(self.tray.lock().unwrap().as_ref().expect("tray was requested"))
    }
}

impl Collaborators for MockCollaborators {
    fn notifier(&self) -> Result<Arc<dyn Notifier>, BoxError> {
        self.log.record("new_notifier");
        if self.fail_notifier {
            return Err("toast backend unavailable".into());
        }
        Ok(Arc::new(MockNotifier))
    }

    fn config(&self, _notifier: Arc<dyn Notifier>) -> Result<Arc<dyn ConfigSource>, BoxError> {
        self.log.record("new_config");
        if self.fail_config {
            return Err("config directory not readable".into());
        }
        Ok(Arc::new(MockConfig {
            log: self.log.clone(),
            fail_load: self.fail_load,
            fail_stop: self.fail_stop_watch,
            token: CancellationToken::new(),
        }))
    }

    fn tray(&self) -> Arc<dyn Tray> {
        let tray = Arc::new(MockTray {
            log: self.log.clone(),
            behavior: self.tray_behavior,
            fail_stop: self.fail_stop_tray,
            run_result: Mutex::default(),
        });
        *self.tray.lock().unwrap() = Some(Arc::clone(&tray));
        tray
    }

    fn interrupt_bridge(&self) -> Arc<dyn InterruptBridge> {
        Arc::clone(&self.interrupts) as Arc<dyn InterruptBridge>
    }

    fn terminator(&self) -> Arc<dyn ProcessTerminator> {
        Arc::clone(&self.terminator) as Arc<dyn ProcessTerminator>
    }
}
