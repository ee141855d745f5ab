//! Scoped expiry ticker
//!
//! A background task that yields the wall-clock time at a fixed interval.
//! The task is aborted when the ticker is dropped.

use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

pub struct ExpiryTicker {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<DateTime<Local>>,
}

impl ExpiryTicker {
    /// Start ticking every `period`
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if tx.send(focuslock_util::now()).await.is_err() {
                    break;
                }
            }
        });

        debug!(period_ms = period.as_millis() as u64, "Expiry ticker started");

        Self { handle, rx }
    }

    /// Wait for the next tick
    pub async fn next(&mut self) -> Option<DateTime<Local>> {
        self.rx.recv().await
    }
}

impl Drop for ExpiryTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Expiry ticker stopped");
    }
}
