// src/ui/host.rs

//! Minimal UI host used by the `gitexec` binary.
//!
//! The UI loop is a single Tokio task that owns all drawing. Other tasks talk
//! to it only through [`UiHandle`], which queues [`UiMessage`]s; nothing
//! outside the loop writes the status line.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use console::Term;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::errors::GitexecError;
use crate::status::StatusController;
use crate::ui::{ErrorSurfacer, OutputSink, RepaintHandle};

/// Messages processed by the UI loop.
#[derive(Debug)]
pub enum UiMessage {
    Repaint,
    /// Stop drawing; the sender is acknowledged once the loop has let go of
    /// the terminal.
    Suspend(oneshot::Sender<()>),
    Resume,
    Shutdown,
}

/// Cloneable sender side of the UI loop.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiMessage>,
}

impl UiHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Ask the loop to stop drawing and wait until it has.
    ///
    /// Returns `false` if the loop is no longer running.
    pub async fn suspend(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(UiMessage::Suspend(ack_tx)).is_err() {
            return false;
        }
        ack_rx.await.is_ok()
    }

    pub fn resume(&self) {
        let _ = self.tx.send(UiMessage::Resume);
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(UiMessage::Shutdown);
    }
}

impl RepaintHandle for UiHandle {
    fn request_repaint(&self) {
        if self.tx.send(UiMessage::Repaint).is_err() {
            trace!("repaint requested after UI loop exited");
        }
    }
}

/// Counters reported when the UI loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiStats {
    pub repaints: u64,
    pub suspensions: u64,
    pub resumes: u64,
}

/// Spawn the UI loop. It runs until [`UiHandle::shutdown`] is called or every
/// handle is dropped.
pub fn spawn_ui_loop(
    mut rx: mpsc::UnboundedReceiver<UiMessage>,
    status: StatusController,
) -> JoinHandle<UiStats> {
    tokio::spawn(async move {
        let term = Term::stderr();
        let mut painter = StatusPainter::new(term);
        let mut stats = UiStats::default();
        let mut suspended = false;

        debug!("UI loop started");

        while let Some(msg) = rx.recv().await {
            match msg {
                UiMessage::Repaint => {
                    stats.repaints += 1;
                    if !suspended {
                        painter.paint(status.render());
                    }
                }
                UiMessage::Suspend(ack) => {
                    stats.suspensions += 1;
                    painter.paint(None);
                    suspended = true;
                    let _ = ack.send(());
                }
                UiMessage::Resume => {
                    stats.resumes += 1;
                    suspended = false;
                    painter.paint(status.render());
                }
                UiMessage::Shutdown => break,
            }
        }

        painter.paint(None);
        debug!(?stats, "UI loop finished");
        stats
    })
}

/// Draws the one-line status on a terminal, skipping redundant writes.
struct StatusPainter {
    term: Term,
    last: Option<String>,
}

impl StatusPainter {
    fn new(term: Term) -> Self {
        Self { term, last: None }
    }

    fn paint(&mut self, line: Option<String>) {
        if line == self.last {
            return;
        }
        if self.term.is_term() {
            let res = self.term.clear_line().and_then(|_| match &line {
                Some(text) => self.term.write_str(text),
                None => Ok(()),
            });
            if let Err(e) = res {
                trace!(error = %e, "failed to draw status line");
            }
        }
        self.last = line;
    }
}

/// In-memory command log, optionally echoed to stdout as it arrives.
#[derive(Debug, Clone, Default)]
pub struct ScrollbackSink {
    buf: Arc<Mutex<String>>,
    echo: bool,
}

impl ScrollbackSink {
    pub fn new(echo: bool) -> Self {
        Self {
            buf: Arc::new(Mutex::new(String::new())),
            echo,
        }
    }

    /// Everything appended so far.
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OutputSink for ScrollbackSink {
    fn append(&self, text: &str) -> io::Result<()> {
        self.buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(text);

        if self.echo {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Reports errors through the log and keeps the latest one as a "toast".
#[derive(Debug, Clone, Default)]
pub struct ToastSurfacer {
    last: Arc<Mutex<Option<String>>>,
}

impl ToastSurfacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_toast(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ErrorSurfacer for ToastSurfacer {
    fn surface(&self, err: GitexecError) -> GitexecError {
        let message = err.to_string();
        error!(error = %message, "surfacing error");
        *self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(message);
        err
    }
}
