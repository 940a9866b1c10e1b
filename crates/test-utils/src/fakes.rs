use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gitexec::config::{ExecSettings, SpinnerSettings};
use gitexec::errors::GitexecError;
use gitexec::exec::CommandDispatcher;
use gitexec::status::StatusController;
use gitexec::types::{BoxFuture, ExecutionOutcome, RefreshMode};
use gitexec::ui::{
    CapabilityProbe, ErrorSurfacer, OutputSink, RefreshScheduler, RepaintHandle,
    TerminalTakeover, UiContext,
};

/// Side effects observed by the fakes, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Append(String),
    Refresh(RefreshMode),
    Surface(String),
    Takeover { command: String, busy: bool },
    OnSuccess,
}

/// Shared, ordered event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<UiEvent>>>);

impl EventLog {
    pub fn push(&self, event: UiEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.0.lock().unwrap().clone()
    }
}

/// Output sink that records every append and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    log: EventLog,
    failing: AtomicBool,
}

impl RecordingSink {
    pub fn set_failing(&self, val: bool) {
        self.failing.store(val, Ordering::SeqCst);
    }
}

impl OutputSink for RecordingSink {
    fn append(&self, text: &str) -> io::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::other("sink closed"));
        }
        self.log.push(UiEvent::Append(text.to_string()));
        Ok(())
    }
}

/// Refresh scheduler that counts calls and optionally fails.
#[derive(Debug, Default)]
pub struct CountingRefresher {
    log: EventLog,
    calls: AtomicUsize,
    fail_with: Mutex<Option<String>>,
}

impl CountingRefresher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, msg: &str) {
        *self.fail_with.lock().unwrap() = Some(msg.to_string());
    }
}

impl RefreshScheduler for CountingRefresher {
    fn refresh(&self, mode: RefreshMode) -> BoxFuture<'_, anyhow::Result<()>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(UiEvent::Refresh(mode));
        let failure = self.fail_with.lock().unwrap().clone();

        Box::pin(async move {
            match failure {
                Some(msg) => Err(anyhow::anyhow!(msg)),
                None => Ok(()),
            }
        })
    }
}

/// Error surfacer that records each surfaced message.
#[derive(Debug, Default)]
pub struct RecordingSurfacer {
    log: EventLog,
    count: AtomicUsize,
}

impl RecordingSurfacer {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ErrorSurfacer for RecordingSurfacer {
    fn surface(&self, err: GitexecError) -> GitexecError {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.log.push(UiEvent::Surface(err.to_string()));
        err
    }
}

/// Repaint handle that only counts requests.
#[derive(Debug, Default)]
pub struct CountingRepaint {
    count: AtomicUsize,
}

impl CountingRepaint {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RepaintHandle for CountingRepaint {
    fn request_repaint(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Terminal takeover with a scripted outcome.
///
/// Records whether the waiting status was held when it was invoked.
pub struct ScriptedTakeover {
    log: EventLog,
    status: StatusController,
    fail_with: Mutex<Option<String>>,
}

impl ScriptedTakeover {
    pub fn fail_with(&self, msg: &str) {
        *self.fail_with.lock().unwrap() = Some(msg.to_string());
    }
}

impl TerminalTakeover for ScriptedTakeover {
    fn run_with_terminal_suspended<'a>(
        &'a self,
        command: &'a str,
    ) -> BoxFuture<'a, ExecutionOutcome> {
        Box::pin(async move {
            self.log.push(UiEvent::Takeover {
                command: command.to_string(),
                busy: self.status.is_busy(),
            });
            match self.fail_with.lock().unwrap().clone() {
                Some(msg) => ExecutionOutcome::Failed(GitexecError::Other(anyhow::anyhow!(msg))),
                None => ExecutionOutcome::Succeeded,
            }
        })
    }
}

/// Capability probe whose answer can be flipped by the test.
#[derive(Debug, Default)]
pub struct FixedCapability(AtomicBool);

impl FixedCapability {
    pub fn set(&self, val: bool) {
        self.0.store(val, Ordering::SeqCst);
    }
}

impl CapabilityProbe for FixedCapability {
    fn requires_interactive_secret(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A full set of recording collaborators sharing one [`EventLog`].
pub struct Harness {
    pub log: EventLog,
    pub sink: Arc<RecordingSink>,
    pub refresher: Arc<CountingRefresher>,
    pub surfacer: Arc<RecordingSurfacer>,
    pub repaint: Arc<CountingRepaint>,
    pub takeover: Arc<ScriptedTakeover>,
    pub capability: Arc<FixedCapability>,
    pub status: StatusController,
}

impl Harness {
    pub fn new() -> Self {
        let log = EventLog::default();
        let repaint = Arc::new(CountingRepaint::default());
        let status = StatusController::new(SpinnerSettings::default(), repaint.clone());

        Self {
            sink: Arc::new(RecordingSink {
                log: log.clone(),
                failing: AtomicBool::new(false),
            }),
            refresher: Arc::new(CountingRefresher {
                log: log.clone(),
                ..CountingRefresher::default()
            }),
            surfacer: Arc::new(RecordingSurfacer {
                log: log.clone(),
                count: AtomicUsize::new(0),
            }),
            takeover: Arc::new(ScriptedTakeover {
                log: log.clone(),
                status: status.clone(),
                fail_with: Mutex::new(None),
            }),
            capability: Arc::new(FixedCapability::default()),
            repaint,
            status,
            log,
        }
    }

    pub fn context(&self) -> UiContext {
        UiContext {
            sink: self.sink.clone(),
            refresher: self.refresher.clone(),
            surfacer: self.surfacer.clone(),
            repaint: self.repaint.clone(),
            takeover: self.takeover.clone(),
            capability: self.capability.clone(),
        }
    }

    pub fn dispatcher(&self, settings: ExecSettings) -> CommandDispatcher {
        CommandDispatcher::new(self.context(), self.status.clone(), settings)
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.log.events()
    }

    /// Concatenation of every append, in order.
    pub fn output(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Append(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Continuation that records itself and succeeds.
    pub fn on_success_ok(&self) -> impl FnOnce() -> anyhow::Result<()> + Send + 'static {
        let log = self.log.clone();
        move || {
            log.push(UiEvent::OnSuccess);
            Ok(())
        }
    }

    /// Continuation that records itself and fails with `msg`.
    pub fn on_success_err(&self, msg: &str) -> impl FnOnce() -> anyhow::Result<()> + Send + 'static {
        let log = self.log.clone();
        let msg = msg.to_string();
        move || {
            log.push(UiEvent::OnSuccess);
            Err(anyhow::anyhow!(msg))
        }
    }

    pub fn on_success_calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, UiEvent::OnSuccess))
            .count()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Exec settings with a fast heartbeat, for tests.
pub fn fast_settings() -> ExecSettings {
    ExecSettings {
        heartbeat_interval: Duration::from_millis(10),
        ..ExecSettings::default()
    }
}
