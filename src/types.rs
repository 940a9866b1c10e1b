use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::errors::GitexecError;

/// Boxed, sendable future used at the trait seams between the executors and
/// their UI collaborators.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Continuation run once after a command exits successfully.
pub type OnSuccess = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// A single request to run a git command.
///
/// Built at the call site and consumed by
/// [`CommandDispatcher::dispatch`](crate::exec::CommandDispatcher::dispatch).
pub struct CommandRequest {
    /// Shell command line, opaque to this layer.
    pub command: String,
    /// Label shown in the waiting status while the command streams.
    pub status_label: String,
    pub on_success: Option<OnSuccess>,
    /// Force the interactive path regardless of the capability probe.
    pub requires_interactive: bool,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, status_label: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            status_label: status_label.into(),
            on_success: None,
            requires_interactive: false,
        }
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn interactive(mut self, val: bool) -> Self {
        self.requires_interactive = val;
        self
    }
}

impl fmt::Debug for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRequest")
            .field("command", &self.command)
            .field("status_label", &self.status_label)
            .field("on_success", &self.on_success.is_some())
            .field("requires_interactive", &self.requires_interactive)
            .finish()
    }
}

/// Which path a request takes through the executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Output captured into the command log, UI keeps drawing.
    Streamed,
    /// Child owns the terminal; UI rendering is suspended.
    Interactive,
}

/// Terminal classification of a child process.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Succeeded,
    Failed(GitexecError),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded)
    }

    /// Split into the success flag and the failure cause, if any.
    pub fn into_parts(self) -> (bool, Option<GitexecError>) {
        match self {
            ExecutionOutcome::Succeeded => (true, None),
            ExecutionOutcome::Failed(err) => (false, Some(err)),
        }
    }
}

/// How a refresh should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Resync before returning.
    Sync,
    /// Schedule the resync and return immediately.
    #[default]
    Async,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_fields() {
        let req = CommandRequest::new("git push", "Pushing")
            .on_success(|| Ok(()))
            .interactive(true);

        assert_eq!(req.command, "git push");
        assert_eq!(req.status_label, "Pushing");
        assert!(req.on_success.is_some());
        assert!(req.requires_interactive);
    }

    #[test]
    fn debug_does_not_require_closure_debug() {
        let req = CommandRequest::new("git fetch", "Fetching").on_success(|| Ok(()));
        let dbg = format!("{req:?}");
        assert!(dbg.contains("git fetch"));
        assert!(dbg.contains("on_success: true"));
    }

    #[test]
    fn outcome_into_parts() {
        let (ok, err) = ExecutionOutcome::Succeeded.into_parts();
        assert!(ok);
        assert!(err.is_none());

        let failed = ExecutionOutcome::Failed(GitexecError::ConfigError("x".into()));
        assert!(!failed.is_success());
        let (ok, err) = failed.into_parts();
        assert!(!ok);
        assert!(err.is_some());
    }
}
