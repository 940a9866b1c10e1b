// tests/dispatcher.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use gitexec::config::ExecSettings;
use gitexec::errors::GitexecError;
use gitexec::types::{CommandRequest, ExecutionMode};
use gitexec_test_utils::{fast_settings, init_tracing, with_timeout, Harness, UiEvent};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn mode_follows_request_flag_and_capability() {
    let h = Harness::new();
    let dispatcher = h.dispatcher(ExecSettings::default());

    let plain = CommandRequest::new("git fetch", "Fetching");
    assert_eq!(dispatcher.select_mode(&plain), ExecutionMode::Streamed);

    let forced = CommandRequest::new("git fetch", "Fetching").interactive(true);
    assert_eq!(dispatcher.select_mode(&forced), ExecutionMode::Interactive);

    h.capability.set(true);
    assert_eq!(dispatcher.select_mode(&plain), ExecutionMode::Interactive);
}

#[tokio::test]
async fn signing_capability_routes_to_takeover_outside_overlay() -> TestResult {
    init_tracing();
    let h = Harness::new();
    h.capability.set(true);
    let dispatcher = h.dispatcher(fast_settings());

    dispatcher
        .dispatch(CommandRequest::new("git commit -S -m msg", "Committing"))
        .await?;

    match &h.events()[0] {
        UiEvent::Takeover { command, busy } => {
            assert_eq!(command, "git commit -S -m msg");
            assert!(!busy, "takeover ran under the waiting status");
        }
        other => panic!("expected takeover first, got {other:?}"),
    }
    assert!(h.output().is_empty());
    assert_eq!(h.refresher.calls(), 1);
    assert!(!h.status.is_busy());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn streamed_request_runs_under_waiting_status() -> TestResult {
    init_tracing();
    let h = Harness::new();
    let dispatcher = h.dispatcher(fast_settings());

    let seen = Arc::new(Mutex::new(None));
    let status = h.status.clone();
    let seen_in_continuation = Arc::clone(&seen);
    let request = CommandRequest::new("echo fetched", "Fetching").on_success(move || {
        *seen_in_continuation.lock().unwrap() = status.label();
        Ok(())
    });

    with_timeout(dispatcher.dispatch(request)).await?;

    assert_eq!(seen.lock().unwrap().as_deref(), Some("Fetching"));
    assert!(!h.status.is_busy());
    assert!(h.output().contains("fetched\n"));
    assert_eq!(h.refresher.calls(), 1);
    assert!(!h
        .events()
        .iter()
        .any(|e| matches!(e, UiEvent::Takeover { .. })));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn waiting_status_cleared_after_failed_command() {
    init_tracing();
    let h = Harness::new();
    let dispatcher = h.dispatcher(fast_settings());

    let err = with_timeout(dispatcher.dispatch(CommandRequest::new("exit 1", "Pushing")))
        .await
        .unwrap_err();

    assert!(matches!(err, GitexecError::CommandFailed { .. }));
    assert!(!h.status.is_busy());
    assert!(h.status.render().is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn continuation_failure_is_the_only_error_seen() {
    init_tracing();
    let h = Harness::new();
    let dispatcher = h.dispatcher(fast_settings());

    let request = CommandRequest::new("true", "Amending").on_success(h.on_success_err("nothing to amend"));
    let err = with_timeout(dispatcher.dispatch(request)).await.unwrap_err();

    assert_eq!(err.to_string(), "nothing to amend");
    assert_eq!(h.refresher.calls(), 0);
    assert_eq!(h.surfacer.count(), 0);
    assert!(!h.status.is_busy());
}
