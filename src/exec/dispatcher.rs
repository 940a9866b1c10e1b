// src/exec/dispatcher.rs

use tracing::debug;

use crate::config::ExecSettings;
use crate::errors::Result;
use crate::exec::interactive::InteractiveRunner;
use crate::exec::streamed::StreamedExecutor;
use crate::status::StatusController;
use crate::types::{CommandRequest, ExecutionMode};
use crate::ui::UiContext;

/// Entry point for running a git command from the UI.
///
/// Chooses the execution mode once per request. Interactive requests go
/// straight to the [`InteractiveRunner`]; they are never wrapped in the
/// waiting status, because a terminal takeover inside the overlay would
/// compete with its redraws. Everything else streams under the overlay.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    ui: UiContext,
    status: StatusController,
    streamed: StreamedExecutor,
    interactive: InteractiveRunner,
}

impl CommandDispatcher {
    pub fn new(ui: UiContext, status: StatusController, settings: ExecSettings) -> Self {
        Self {
            streamed: StreamedExecutor::new(ui.clone(), settings),
            interactive: InteractiveRunner::new(ui.clone()),
            ui,
            status,
        }
    }

    /// Mode for `request`: interactive if the request asks for it or the
    /// signing setup needs a secret prompt.
    pub fn select_mode(&self, request: &CommandRequest) -> ExecutionMode {
        if request.requires_interactive || self.ui.capability.requires_interactive_secret() {
            ExecutionMode::Interactive
        } else {
            ExecutionMode::Streamed
        }
    }

    pub async fn dispatch(&self, request: CommandRequest) -> Result<()> {
        let mode = self.select_mode(&request);
        debug!(command = %request.command, ?mode, "dispatching command");

        let CommandRequest {
            command,
            status_label,
            on_success,
            ..
        } = request;

        match mode {
            ExecutionMode::Interactive => self.interactive.run(&command, on_success).await,
            ExecutionMode::Streamed => {
                self.status
                    .with_waiting_status(&status_label, self.streamed.run(&command, on_success))
                    .await
            }
        }
    }
}
