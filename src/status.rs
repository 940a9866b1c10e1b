// src/status.rs

//! Waiting-status overlay.
//!
//! [`StatusController`] owns the single "UI is busy" indicator. Work is
//! bracketed with [`StatusController::with_waiting_status`], which holds a
//! [`StatusGuard`] for exactly as long as the work runs. The guard restores
//! the previous indicator in `Drop`, so the indicator is cleared on success,
//! on error, on panic unwinding and when the work future is cancelled.
//!
//! Terminal takeover must never run inside the bracketed work: a real UI
//! redraws the spinner while the overlay is held and would fight the child
//! for the terminal. The dispatcher keeps interactive requests out of here.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SpinnerSettings;
use crate::ui::RepaintHandle;

#[derive(Debug, Clone)]
struct BusyState {
    label: String,
    since: Instant,
}

/// Cloneable handle to the busy indicator.
#[derive(Clone)]
pub struct StatusController {
    state: Arc<Mutex<Option<BusyState>>>,
    spinner: SpinnerSettings,
    repaint: Arc<dyn RepaintHandle>,
}

impl std::fmt::Debug for StatusController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusController")
            .field("label", &self.label())
            .field("spinner", &self.spinner)
            .finish_non_exhaustive()
    }
}

impl StatusController {
    pub fn new(spinner: SpinnerSettings, repaint: Arc<dyn RepaintHandle>) -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
            spinner,
            repaint,
        }
    }

    /// Run `work` with the busy indicator set to `label`.
    ///
    /// Returns exactly what `work` returns.
    pub async fn with_waiting_status<F, T>(&self, label: &str, work: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.acquire(label);
        work.await
    }

    /// Set the indicator and return the guard that will restore it.
    pub fn acquire(&self, label: &str) -> StatusGuard {
        let previous = {
            let mut state = self.lock();
            state.replace(BusyState {
                label: label.to_string(),
                since: Instant::now(),
            })
        };
        debug!(label, "waiting status acquired");
        self.repaint.request_repaint();

        StatusGuard {
            controller: self.clone(),
            previous,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_some()
    }

    /// Current busy label, if any.
    pub fn label(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.label.clone())
    }

    /// Status line for the UI: `"<label> <spinner frame>"`, or `None` when idle.
    pub fn render(&self) -> Option<String> {
        let state = self.lock();
        let busy = state.as_ref()?;
        let frame = self.spinner.frame_at(busy.since.elapsed());
        Some(format!("{} {}", busy.label, frame))
    }

    fn lock(&self) -> MutexGuard<'_, Option<BusyState>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Scoped ownership of the busy indicator.
#[must_use = "the waiting status is released as soon as the guard is dropped"]
pub struct StatusGuard {
    controller: StatusController,
    previous: Option<BusyState>,
}

impl Drop for StatusGuard {
    fn drop(&mut self) {
        {
            let mut state = self.controller.lock();
            *state = self.previous.take();
        }
        debug!("waiting status released");
        self.controller.repaint.request_repaint();
    }
}

impl SpinnerSettings {
    /// Frame to show after `elapsed` time in the busy state.
    pub fn frame_at(&self, elapsed: Duration) -> &str {
        if self.frames.is_empty() {
            return "";
        }
        let rate = self.rate.as_millis().max(1);
        let idx = (elapsed.as_millis() / rate) as usize % self.frames.len();
        &self.frames[idx]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingRepaint(AtomicUsize);

    impl RepaintHandle for CountingRepaint {
        fn request_repaint(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller() -> (StatusController, Arc<CountingRepaint>) {
        let repaint = Arc::new(CountingRepaint::default());
        let ctrl = StatusController::new(SpinnerSettings::default(), repaint.clone());
        (ctrl, repaint)
    }

    #[tokio::test]
    async fn label_visible_during_work_and_cleared_after() {
        let (ctrl, repaint) = controller();

        let inner = ctrl.clone();
        let seen = ctrl
            .with_waiting_status("Fetching", async move { inner.label() })
            .await;

        assert_eq!(seen.as_deref(), Some("Fetching"));
        assert!(!ctrl.is_busy());
        assert_eq!(repaint.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cleared_when_work_fails() {
        let (ctrl, _) = controller();

        let res: Result<(), &str> = ctrl
            .with_waiting_status("Pushing", async { Err("rejected") })
            .await;

        assert_eq!(res, Err("rejected"));
        assert!(ctrl.label().is_none());
    }

    #[tokio::test]
    async fn cleared_when_work_is_cancelled() {
        let (ctrl, _) = controller();

        let pending = ctrl.with_waiting_status("Pulling", std::future::pending::<()>());
        let res = tokio::time::timeout(Duration::from_millis(20), pending).await;

        assert!(res.is_err());
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn nested_guard_restores_outer_label() {
        let (ctrl, _) = controller();

        let outer = ctrl.acquire("outer");
        {
            let _inner = ctrl.acquire("inner");
            assert_eq!(ctrl.label().as_deref(), Some("inner"));
        }
        assert_eq!(ctrl.label().as_deref(), Some("outer"));
        drop(outer);
        assert!(ctrl.label().is_none());
    }

    #[test]
    fn render_shows_label_and_first_frame() {
        let (ctrl, _) = controller();
        assert!(ctrl.render().is_none());

        let _guard = ctrl.acquire("Fetching");
        let line = ctrl.render().unwrap();
        assert!(line.starts_with("Fetching "));
    }

    #[test]
    fn frame_cycles_with_elapsed_time() {
        let spinner = SpinnerSettings {
            frames: vec!["a".into(), "b".into(), "c".into()],
            rate: Duration::from_millis(10),
        };

        assert_eq!(spinner.frame_at(Duration::from_millis(0)), "a");
        assert_eq!(spinner.frame_at(Duration::from_millis(15)), "b");
        assert_eq!(spinner.frame_at(Duration::from_millis(25)), "c");
        assert_eq!(spinner.frame_at(Duration::from_millis(30)), "a");
    }
}
