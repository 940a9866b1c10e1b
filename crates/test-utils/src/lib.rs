//! Shared fixtures for `gitexec` integration tests.

pub mod fakes;

pub use fakes::{
    fast_settings, CountingRefresher, CountingRepaint, EventLog, FixedCapability, Harness,
    RecordingSink, RecordingSurfacer, ScriptedTakeover, UiEvent,
};

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test-writer tracing subscriber once per test binary.
///
/// Output is captured by the harness and only shown for failing tests.
/// `RUST_LOG` selects the level; `info` otherwise.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Fail the test if `f` has not resolved within five seconds.
///
/// Guards against a child process or heartbeat that never finishes.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("test timed out after 5 seconds")
}
