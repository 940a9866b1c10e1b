// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod git;
pub mod logging;
pub mod status;
pub mod types;
pub mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_or_default};
use crate::exec::CommandDispatcher;
use crate::git::{GitConfigProbe, PanelRefresher};
use crate::status::StatusController;
use crate::types::CommandRequest;
use crate::ui::host::{spawn_ui_loop, ScrollbackSink, ToastSurfacer, UiHandle};
use crate::ui::terminal::SuspendingTakeover;
use crate::ui::{RepaintHandle, UiContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the UI loop and its status line
/// - the command log, error toasts, panel refresher and GPG probe
/// - the dispatcher, which runs the single requested command
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path)?;
    debug!(?cfg, "configuration loaded");

    let (ui_handle, ui_rx) = UiHandle::channel();
    let repaint: Arc<dyn RepaintHandle> = Arc::new(ui_handle.clone());
    let status = StatusController::new(cfg.spinner.clone(), repaint.clone());
    let ui_task = spawn_ui_loop(ui_rx, status.clone());

    let sink = ScrollbackSink::new(!args.quiet);
    let refresher = PanelRefresher::new(None);
    let capability = GitConfigProbe::detect(cfg.override_gpg).await;
    let takeover = SuspendingTakeover::new(ui_handle.clone(), cfg.exec.shell.clone());

    let ui = UiContext {
        sink: Arc::new(sink.clone()),
        refresher: Arc::new(refresher.clone()),
        surfacer: Arc::new(ToastSurfacer::new()),
        repaint,
        takeover: Arc::new(takeover),
        capability: Arc::new(capability),
    };

    let dispatcher = CommandDispatcher::new(ui, status, cfg.exec.clone());
    let request = CommandRequest::new(args.command_line(), args.status.clone())
        .interactive(args.interactive);

    let result = dispatcher.dispatch(request).await;

    refresher.settle().await;
    ui_handle.shutdown();
    let stats = ui_task.await?;
    info!(
        repaints = stats.repaints,
        changed_entries = refresher.snapshot().changed_entries,
        "gitexec finished"
    );

    if args.print_log {
        print!("{}", sink.contents());
    }

    result.map_err(anyhow::Error::from)
}
