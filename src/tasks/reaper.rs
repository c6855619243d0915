//! Stale Entry Reaper
//!
//! Background task that periodically sweeps stale entries out of a store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Handle to a running reaper task.
///
/// Dropping the handle stops the task. Use [`ReaperHandle::shutdown`] to stop
/// it and wait for the loop to exit.
#[derive(Debug)]
pub struct ReaperHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    /// Signals the task to stop after its current sweep. Idempotent.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    warn!("Reaper task ended abnormally: {}", err);
                }
            }
        }
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.stop_tx.send_replace(true);
            task.abort();
        }
    }
}

/// Spawns a task that sweeps `store` once per `interval`.
///
/// Each sweep takes the write lock and removes every entry whose age has
/// reached `interval`. The first sweep runs one full interval after spawning.
/// Must be called from within a tokio runtime; `interval` must be non-zero.
pub fn spawn_reaper_task(store: Arc<RwLock<CacheStore>>, interval: Duration) -> ReaperHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let start = Instant::now() + interval;

    let task = tokio::spawn(async move {
        info!("Starting reaper task with interval of {:?}", interval);

        let mut ticker = time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                // Err means every sender is gone, which is also a stop.
                _ = stop_rx.changed() => break,
            }

            let removed = {
                let mut guard = store.write().await;
                guard.evict_stale(interval)
            };

            if removed > 0 {
                info!("Reaper sweep: removed {} stale entries", removed);
            } else {
                debug!("Reaper sweep: no stale entries found");
            }
        }

        debug!("Reaper task stopped");
    });

    ReaperHandle {
        stop_tx,
        task: Some(task),
    }
}
