// src/git.rs

//! Host adapters that talk to git: the panel refresher and the GPG
//! capability probe.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::types::{BoxFuture, RefreshMode};
use crate::ui::{CapabilityProbe, RefreshScheduler};

/// What the last completed refresh saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoSnapshot {
    /// Entries reported by `git status --porcelain`.
    pub changed_entries: usize,
    /// Number of refreshes completed so far.
    pub refreshes: u64,
}

/// Refreshes the repository snapshot from `git status`.
///
/// In [`RefreshMode::Async`] the status call runs on a spawned task and
/// `refresh` returns immediately; [`PanelRefresher::settle`] waits for
/// outstanding refreshes before shutdown.
#[derive(Debug, Clone, Default)]
pub struct PanelRefresher {
    repo_dir: Option<PathBuf>,
    snapshot: Arc<Mutex<RepoSnapshot>>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl PanelRefresher {
    pub fn new(repo_dir: Option<PathBuf>) -> Self {
        Self {
            repo_dir,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> RepoSnapshot {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait for every scheduled async refresh to finish.
    pub async fn settle(&self) {
        let handles: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "async refresh task did not finish cleanly");
            }
        }
    }

    async fn refresh_now(
        repo_dir: Option<PathBuf>,
        snapshot: Arc<Mutex<RepoSnapshot>>,
    ) -> anyhow::Result<()> {
        let mut cmd = Command::new("git");
        cmd.args(["status", "--porcelain"]);
        if let Some(dir) = &repo_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.context("running git status")?;
        if !output.status.success() {
            bail!(
                "git status exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let changed_entries = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();

        let mut snap = snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        snap.changed_entries = changed_entries;
        snap.refreshes += 1;
        info!(changed_entries, refreshes = snap.refreshes, "panels refreshed");
        Ok(())
    }
}

impl RefreshScheduler for PanelRefresher {
    fn refresh(&self, mode: RefreshMode) -> BoxFuture<'_, anyhow::Result<()>> {
        let repo_dir = self.repo_dir.clone();
        let snapshot = Arc::clone(&self.snapshot);

        Box::pin(async move {
            match mode {
                RefreshMode::Sync => Self::refresh_now(repo_dir, snapshot).await,
                RefreshMode::Async => {
                    let handle = tokio::spawn(async move {
                        if let Err(e) = Self::refresh_now(repo_dir, snapshot).await {
                            warn!(error = %e, "async refresh failed");
                        }
                    });
                    let mut pending = self
                        .pending
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    pending.retain(|h| !h.is_finished());
                    pending.push(handle);
                    Ok(())
                }
            }
        })
    }
}

/// Reports whether commits are GPG-signed, in which case git may prompt
/// for a passphrase and needs the terminal.
#[derive(Debug, Clone, Copy)]
pub struct GitConfigProbe {
    requires_secret: bool,
}

impl GitConfigProbe {
    /// Query `commit.gpgSign` once and cache the answer.
    ///
    /// `override_gpg` forces the streamed path regardless of git config.
    pub async fn detect(override_gpg: bool) -> Self {
        if override_gpg {
            debug!("override_gpg set; never using interactive signing path");
            return Self {
                requires_secret: false,
            };
        }

        let output = Command::new("git")
            .args(["config", "--bool", "commit.gpgSign"])
            .output()
            .await;

        let requires_secret = match output {
            Ok(out) if out.status.success() => parse_git_bool(&String::from_utf8_lossy(&out.stdout)),
            Ok(_) => false,
            Err(e) => {
                debug!(error = %e, "could not run git config; assuming no GPG signing");
                false
            }
        };

        debug!(requires_secret, "detected GPG signing capability");
        Self { requires_secret }
    }
}

impl CapabilityProbe for GitConfigProbe {
    fn requires_interactive_secret(&self) -> bool {
        self.requires_secret
    }
}

fn parse_git_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}
