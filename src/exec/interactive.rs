// src/exec/interactive.rs

//! Interactive execution: the child gets the terminal (e.g. for a GPG
//! passphrase prompt) while UI rendering is suspended.

use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::completion::{self, CompletionPath};
use crate::types::OnSuccess;
use crate::ui::UiContext;

/// Runs commands through the UI's terminal takeover.
///
/// No heartbeat is needed: nothing is drawn while the child owns the screen.
#[derive(Debug, Clone)]
pub struct InteractiveRunner {
    ui: UiContext,
}

impl InteractiveRunner {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }

    /// Run `command` with the terminal suspended, then apply the completion
    /// contract.
    ///
    /// The refresh runs even when the child failed. Its error takes priority
    /// over the child's; a failing continuation skips it entirely.
    pub async fn run(&self, command: &str, on_success: Option<OnSuccess>) -> Result<()> {
        info!(command = %command, "handing terminal to interactive command");

        let outcome = self.ui.takeover.run_with_terminal_suspended(command).await;
        let (succeeded, child_err) = outcome.into_parts();

        if let Some(err) = &child_err {
            warn!(command = %command, error = %err, "interactive command failed");
        }

        if succeeded {
            completion::run_on_success(on_success)?;
        }

        completion::schedule_refresh(self.ui.refresher.as_ref(), CompletionPath::Interactive)
            .await?;

        match child_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
