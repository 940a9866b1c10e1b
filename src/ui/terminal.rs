// src/ui/terminal.rs

//! Handing the terminal to a child process.

use std::process::Stdio;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use tracing::{debug, warn};

use crate::errors::{ExecutionFailure, GitexecError};
use crate::exec::command::shell_command;
use crate::types::{BoxFuture, ExecutionOutcome};
use crate::ui::host::UiHandle;
use crate::ui::TerminalTakeover;

/// Terminal takeover backed by the host UI loop.
///
/// Suspends the UI loop, puts the terminal back into cooked mode, runs the
/// command with inherited stdio, then restores raw mode if it was on.
/// Restoration happens in a guard, so it also runs if the future is dropped
/// part-way.
#[derive(Debug, Clone)]
pub struct SuspendingTakeover {
    ui: UiHandle,
    shell: Option<String>,
}

impl SuspendingTakeover {
    pub fn new(ui: UiHandle, shell: Option<String>) -> Self {
        Self { ui, shell }
    }
}

impl TerminalTakeover for SuspendingTakeover {
    fn run_with_terminal_suspended<'a>(
        &'a self,
        command: &'a str,
    ) -> BoxFuture<'a, ExecutionOutcome> {
        Box::pin(async move {
            if !self.ui.suspend().await {
                warn!("UI loop not running; running interactive command anyway");
            }
            let _restore = TerminalRelease::acquire(self.ui.clone());

            let mut cmd = shell_command(command, self.shell.as_deref());
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());

            match cmd.status().await {
                Ok(status) if status.success() => ExecutionOutcome::Succeeded,
                Ok(status) => {
                    ExecutionOutcome::Failed(ExecutionFailure::NonZeroExit(status).into())
                }
                Err(source) => ExecutionOutcome::Failed(GitexecError::ProcessStart {
                    command: command.to_string(),
                    source,
                }),
            }
        })
    }
}

/// Terminal released to a child; restored and UI resumed on drop.
struct TerminalRelease {
    ui: UiHandle,
    raw_mode: bool,
}

impl TerminalRelease {
    fn acquire(ui: UiHandle) -> Self {
        let raw_mode = is_raw_mode_enabled().unwrap_or(false);
        if raw_mode {
            if let Err(e) = disable_raw_mode() {
                warn!(error = %e, "failed to leave raw mode");
            }
        }
        debug!(raw_mode, "terminal released to child");

        Self { ui, raw_mode }
    }
}

impl Drop for TerminalRelease {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = enable_raw_mode() {
                warn!(error = %e, "failed to restore raw mode");
            }
        }
        debug!("terminal restored; resuming UI");
        self.ui.resume();
    }
}
