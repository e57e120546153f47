//! Periodic withdrawal sweep.
//!
//! Withdrawal depends on elapsed real time, so nothing in a session changes
//! when it starts. Only the game master's runtime runs this worker: it asks
//! the session to recompute every stored flag at a fixed interval, the
//! first time right away.

use tokio::sync::oneshot;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::RuntimeHandle;

pub struct SweepWorker {
    handle: RuntimeHandle,
    interval: Duration,
    shutdown_rx: oneshot::Receiver<()>,
}

impl SweepWorker {
    pub fn new(handle: RuntimeHandle, interval: Duration, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self {
            handle,
            interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "SweepWorker started");
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut self.shutdown_rx => break,
                _ = ticker.tick() => {
                    match self.handle.sweep_withdrawal().await {
                        Ok(changes) => debug!(flipped = changes.len(), "withdrawal sweep"),
                        Err(error) => {
                            warn!(%error, "withdrawal sweep failed, stopping");
                            break;
                        }
                    }
                }
            }
        }
        info!("SweepWorker stopped");
    }
}
