// src/exec/streamed.rs

//! Streamed execution: run a command with its output captured into the
//! command log while the UI keeps drawing.
//!
//! Lifecycle of one call to [`StreamedExecutor::run`]:
//!
//! ```text
//! Idle -> Starting -> Running -> Succeeded | Failed -> Refreshing -> Done
//! ```
//!
//! - Starting: header line appended, child spawned with `TERM=dumb` (or the
//!   configured overlay) and piped stdout/stderr. A spawn failure is surfaced
//!   at once: no heartbeat, no refresh.
//! - Running: heartbeat started, output pumped into the sink, exit awaited,
//!   pumps joined. Only then is the heartbeat stopped.
//! - Failed: red error line appended, refresh scheduled and its result
//!   discarded, a single "command failed" error surfaced.
//! - Succeeded: continuation run; refresh scheduled and returned unless the
//!   continuation failed.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ExecSettings;
use crate::errors::{ExecutionFailure, GitexecError, Result};
use crate::exec::command::{apply_env_overlay, shell_command};
use crate::exec::completion::{self, CompletionPath};
use crate::exec::heartbeat::Heartbeat;
use crate::types::{ExecutionOutcome, OnSuccess};
use crate::ui::{style, OutputSink, UiContext};

const READ_CHUNK: usize = 4096;

/// Runs commands with output streamed into the UI's command log.
#[derive(Debug, Clone)]
pub struct StreamedExecutor {
    ui: UiContext,
    settings: ExecSettings,
}

impl StreamedExecutor {
    pub fn new(ui: UiContext, settings: ExecSettings) -> Self {
        Self { ui, settings }
    }

    /// Run `command` to completion and apply the completion contract.
    pub async fn run(&self, command: &str, on_success: Option<OnSuccess>) -> Result<()> {
        info!(command = %command, "starting streamed command");

        if let Err(e) = self.ui.sink.append(&style::header_line()) {
            warn!(error = %e, "failed to write command header to output");
        }

        let mut cmd = shell_command(command, self.settings.shell.as_deref());
        apply_env_overlay(&mut cmd, &self.settings.env_overlay);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                error!(command = %command, error = %source, "failed to spawn command");
                return Err(self.ui.surfacer.surface(GitexecError::ProcessStart {
                    command: command.to_string(),
                    source,
                }));
            }
        };

        let heartbeat = Heartbeat::start(self.settings.heartbeat_interval, self.ui.repaint.clone());
        let outcome = self.wait_streaming(child).await;
        heartbeat.stop().await;

        match outcome {
            ExecutionOutcome::Succeeded => {
                info!(command = %command, "streamed command succeeded");
                completion::run_on_success(on_success)?;
                completion::schedule_refresh(
                    self.ui.refresher.as_ref(),
                    CompletionPath::StreamedSuccess,
                )
                .await
            }
            ExecutionOutcome::Failed(err) => self.fail(command, err).await,
        }
    }

    /// Pump output into the sink until the child exits and both streams are
    /// drained.
    async fn wait_streaming(&self, mut child: Child) -> ExecutionOutcome {
        let stdout_pump = child
            .stdout
            .take()
            .map(|out| spawn_pump(out, self.ui.sink.clone()));
        let stderr_pump = child
            .stderr
            .take()
            .map(|err| spawn_pump(err, self.ui.sink.clone()));

        let status = child.wait().await;

        let stdout_res = join_pump(stdout_pump).await;
        let stderr_res = join_pump(stderr_pump).await;

        classify(status, stdout_res.and(stderr_res))
    }

    async fn fail(&self, command: &str, err: GitexecError) -> Result<()> {
        warn!(command = %command, error = %err, "streamed command failed");

        if let Err(e) = self.ui.sink.append(&style::error_line(&err.to_string())) {
            error!(error = %e, "failed to write command error to output");
        }

        completion::schedule_refresh(self.ui.refresher.as_ref(), CompletionPath::StreamedFailure)
            .await?;

        Err(self.ui.surfacer.surface(GitexecError::CommandFailed {
            extras_key: self.settings.extras_key.clone(),
        }))
    }
}

fn classify(status: io::Result<ExitStatus>, streams: io::Result<()>) -> ExecutionOutcome {
    let failure = match status {
        Err(e) => ExecutionFailure::Wait(e),
        Ok(status) if !status.success() => {
            debug!(exit_code = ?status.code(), "process exited unsuccessfully");
            ExecutionFailure::NonZeroExit(status)
        }
        Ok(_) => match streams {
            Ok(()) => return ExecutionOutcome::Succeeded,
            Err(e) => ExecutionFailure::Stream(e),
        },
    };
    ExecutionOutcome::Failed(failure.into())
}

/// Copy `reader` into `sink` chunk by chunk.
///
/// The stream is always drained to EOF so the child never blocks on a full
/// pipe; the first sink error is remembered and returned at the end.
fn spawn_pump<R>(mut reader: R, sink: Arc<dyn OutputSink>) -> JoinHandle<io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_CHUNK];
        let mut pending = Vec::new();
        let mut sink_err: Option<io::Error> = None;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            pending.extend_from_slice(&buf[..n]);
            let text = take_utf8_prefix(&mut pending);
            if text.is_empty() || sink_err.is_some() {
                continue;
            }
            if let Err(e) = sink.append(&text) {
                warn!(error = %e, "failed to append command output");
                sink_err = Some(e);
            }
        }

        if !pending.is_empty() && sink_err.is_none() {
            let tail = String::from_utf8_lossy(&pending).into_owned();
            if let Err(e) = sink.append(&tail) {
                sink_err = Some(e);
            }
        }

        match sink_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

async fn join_pump(pump: Option<JoinHandle<io::Result<()>>>) -> io::Result<()> {
    match pump {
        Some(handle) => handle.await.map_err(io::Error::other)?,
        None => Ok(()),
    }
}

/// Decode as much of `pending` as possible, leaving an incomplete trailing
/// UTF-8 sequence in place for the next chunk. Invalid bytes become U+FFFD.
fn take_utf8_prefix(pending: &mut Vec<u8>) -> String {
    let mut out = String::new();
    let mut consumed = 0;

    loop {
        match std::str::from_utf8(&pending[consumed..]) {
            Ok(s) => {
                out.push_str(s);
                consumed = pending.len();
                break;
            }
            Err(e) => {
                let valid_end = consumed + e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&pending[consumed..valid_end]));
                match e.error_len() {
                    Some(bad) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        consumed = valid_end + bad;
                    }
                    None => {
                        consumed = valid_end;
                        break;
                    }
                }
            }
        }
    }

    pending.drain(..consumed);
    out
}
