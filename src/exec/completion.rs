// src/exec/completion.rs

//! Completion contract shared by the streamed and interactive paths.
//!
//! Once a child's outcome is known:
//! 1. run the success continuation (only on success, at most once);
//! 2. if it failed, return its error and skip the refresh;
//! 3. otherwise schedule an async refresh.
//!
//! Whether a refresh error reaches the caller depends on the path; that
//! decision is made in exactly one place, [`surfaces_refresh_error`].

use tracing::{debug, warn};

use crate::errors::{GitexecError, Result};
use crate::types::{OnSuccess, RefreshMode};
use crate::ui::RefreshScheduler;

/// Where a refresh is being scheduled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPath {
    /// Streamed command exited cleanly and the continuation (if any) passed.
    StreamedSuccess,
    /// Streamed command failed; the user is shown the command failure instead.
    StreamedFailure,
    /// Interactive command finished, successfully or not.
    Interactive,
}

/// Refresh-error policy.
///
/// A refresh error is returned to the caller on the streamed success path and
/// on the interactive path, and dropped after a streamed failure.
pub fn surfaces_refresh_error(path: CompletionPath) -> bool {
    match path {
        CompletionPath::StreamedSuccess | CompletionPath::Interactive => true,
        CompletionPath::StreamedFailure => false,
    }
}

/// Run the continuation, if present.
pub(crate) fn run_on_success(on_success: Option<OnSuccess>) -> Result<()> {
    match on_success {
        Some(f) => f().map_err(|err| {
            debug!(error = %err, "success continuation failed; skipping refresh");
            GitexecError::SuccessContinuation(err)
        }),
        None => Ok(()),
    }
}

/// Schedule an async refresh and apply the refresh-error policy for `path`.
pub(crate) async fn schedule_refresh(
    refresher: &dyn RefreshScheduler,
    path: CompletionPath,
) -> Result<()> {
    debug!(?path, "scheduling async refresh");
    let res = refresher
        .refresh(RefreshMode::Async)
        .await
        .map_err(GitexecError::Refresh);

    match res {
        Err(err) if !surfaces_refresh_error(path) => {
            warn!(?path, error = %err, "refresh failed; discarding");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoxFuture;

    struct FailingRefresher;

    impl RefreshScheduler for FailingRefresher {
        fn refresh(&self, _mode: RefreshMode) -> BoxFuture<'_, anyhow::Result<()>> {
            Box::pin(async { Err(anyhow::anyhow!("index.lock exists")) })
        }
    }

    #[test]
    fn policy_table() {
        assert!(surfaces_refresh_error(CompletionPath::StreamedSuccess));
        assert!(surfaces_refresh_error(CompletionPath::Interactive));
        assert!(!surfaces_refresh_error(CompletionPath::StreamedFailure));
    }

    #[tokio::test]
    async fn refresh_error_discarded_only_after_streamed_failure() {
        let discarded = schedule_refresh(&FailingRefresher, CompletionPath::StreamedFailure).await;
        assert!(discarded.is_ok());

        let surfaced = schedule_refresh(&FailingRefresher, CompletionPath::StreamedSuccess).await;
        match surfaced {
            Err(GitexecError::Refresh(e)) => assert_eq!(e.to_string(), "index.lock exists"),
            other => panic!("expected refresh error, got {other:?}"),
        }
    }

    #[test]
    fn continuation_error_is_wrapped_transparently() {
        let err = run_on_success(Some(Box::new(|| Err(anyhow::anyhow!("nothing to amend")))))
            .unwrap_err();
        assert!(matches!(err, GitexecError::SuccessContinuation(_)));
        assert_eq!(err.to_string(), "nothing to amend");

        assert!(run_on_success(None).is_ok());
    }
}
