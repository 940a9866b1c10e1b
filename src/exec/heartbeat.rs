// src/exec/heartbeat.rs

//! Periodic repaint requests while a streamed command is running.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::ui::RepaintHandle;

/// Handle to a running heartbeat task.
///
/// The task asks the UI loop for a repaint every `interval` until
/// [`Heartbeat::stop`] is called. `stop` consumes the handle, so the stop
/// signal is sent at most once, and it awaits the task so the heartbeat has
/// finished before the caller moves on.
///
/// Dropping a heartbeat without stopping it closes the signal channel, which
/// also ends the task.
pub struct Heartbeat {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<u64>,
}

impl Heartbeat {
    pub fn start(interval: Duration, repaint: Arc<dyn RepaintHandle>) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            let mut beats = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        repaint.request_repaint();
                        beats += 1;
                    }
                }
            }
            beats
        });

        Self { stop_tx, handle }
    }

    /// Signal the task to stop and wait for it to finish.
    ///
    /// Returns how many repaints the heartbeat requested.
    pub async fn stop(self) -> u64 {
        if self.stop_tx.send(()).is_err() {
            debug!("heartbeat already finished before stop signal");
        }

        match self.handle.await {
            Ok(beats) => {
                debug!(beats, "heartbeat stopped");
                beats
            }
            Err(e) => {
                warn!(error = %e, "heartbeat task did not finish cleanly");
                0
            }
        }
    }
}
