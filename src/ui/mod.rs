// src/ui/mod.rs

//! UI collaborators consumed by the executors.
//!
//! The executors never touch panels or the terminal directly. Everything they
//! need from the surrounding UI goes through the traits in this module, bundled
//! into a cloneable [`UiContext`]:
//!
//! - [`OutputSink`]: append-only command log.
//! - [`RefreshScheduler`]: resync panels from repository state.
//! - [`ErrorSurfacer`]: show an error to the user.
//! - [`RepaintHandle`]: queue a repaint onto the UI loop.
//! - [`TerminalTakeover`]: hand the terminal to a child process.
//! - [`CapabilityProbe`]: does signing need an interactive prompt?
//!
//! Concrete implementations used by the `gitexec` binary live in [`host`] and
//! [`terminal`]. Tests swap in recording fakes.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::errors::GitexecError;
use crate::types::{BoxFuture, ExecutionOutcome, RefreshMode};

pub mod host;
pub mod style;
pub mod terminal;

pub trait OutputSink: Send + Sync {
    fn append(&self, text: &str) -> io::Result<()>;
}

pub trait RefreshScheduler: Send + Sync {
    /// Resync dependent panels.
    ///
    /// With [`RefreshMode::Async`] the returned future must resolve as soon as
    /// the work is scheduled; the caller never waits on the resync itself.
    fn refresh(&self, mode: RefreshMode) -> BoxFuture<'_, anyhow::Result<()>>;
}

pub trait ErrorSurfacer: Send + Sync {
    /// Render `err` for the user and hand back the error to propagate.
    fn surface(&self, err: GitexecError) -> GitexecError;
}

pub trait RepaintHandle: Send + Sync {
    /// Ask the UI loop to redraw. Must not block and must not paint inline.
    fn request_repaint(&self);
}

pub trait TerminalTakeover: Send + Sync {
    /// Suspend rendering, run `command` with full terminal control, resume.
    fn run_with_terminal_suspended<'a>(
        &'a self,
        command: &'a str,
    ) -> BoxFuture<'a, ExecutionOutcome>;
}

pub trait CapabilityProbe: Send + Sync {
    fn requires_interactive_secret(&self) -> bool;
}

/// Everything the executors need from the UI, shared by reference count.
#[derive(Clone)]
pub struct UiContext {
    pub sink: Arc<dyn OutputSink>,
    pub refresher: Arc<dyn RefreshScheduler>,
    pub surfacer: Arc<dyn ErrorSurfacer>,
    pub repaint: Arc<dyn RepaintHandle>,
    pub takeover: Arc<dyn TerminalTakeover>,
    pub capability: Arc<dyn CapabilityProbe>,
}

impl fmt::Debug for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiContext").finish_non_exhaustive()
    }
}
