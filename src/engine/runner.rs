// src/engine/runner.rs

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::errors::{AutounlockError, Result};
use crate::exec::Spawner;
use crate::types::WorkItem;

use super::RunnerOptions;
use super::core::{BatchCore, RunnerSnapshot};

/// The timer task currently driving the core, if any.
struct TickTimer {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Drives a [`BatchCore`] from a periodic Tokio timer.
///
/// This is the IO shell around the core: it owns the interval, the start /
/// stop lifecycle and the drained notification. All scheduling semantics
/// live in the core.
///
/// Ticks run on a single dedicated Tokio task, one after another. The core
/// sits behind a mutex only so a later `start()` can pick up where a
/// `stop()` left off and so status queries can read it; the lock is never
/// held across an `.await`.
pub struct BatchRunner<S: Spawner> {
    core: Arc<Mutex<BatchCore<S>>>,
    tick_interval: Duration,
    timer: Option<TickTimer>,
    drained_tx: Arc<watch::Sender<bool>>,
}

impl<S: Spawner> fmt::Debug for BatchRunner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("core", &*lock_core(&self.core))
            .field("tick_interval", &self.tick_interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<S: Spawner> BatchRunner<S> {
    /// Validate `options` and build a stopped runner over `items`.
    pub fn new(items: Vec<WorkItem>, options: RunnerOptions, spawner: S) -> Result<Self> {
        options.validate()?;
        let core = BatchCore::new(items, options.concurrency_cap, spawner)?;
        let (drained_tx, _) = watch::channel(false);

        Ok(Self {
            core: Arc::new(Mutex::new(core)),
            tick_interval: options.tick_interval,
            timer: None,
            drained_tx: Arc::new(drained_tx),
        })
    }

    /// Begin ticking on the current Tokio runtime.
    ///
    /// The first tick fires one full interval after this call. Calling
    /// `start()` while already running, or after the runner has drained, does
    /// nothing. After `stop()` it resumes from the current cursor.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            debug!("batch runner already running; ignoring start");
            return Ok(());
        }

        let snapshot = self.snapshot();
        if snapshot.drained {
            debug!("batch runner already drained; ignoring start");
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| AutounlockError::NoRuntime)?;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let task = handle.spawn(tick_loop(
            Arc::clone(&self.core),
            self.tick_interval,
            Arc::clone(&self.drained_tx),
            stop_rx,
        ));

        self.timer = Some(TickTimer { stop_tx, task });

        info!(
            items = snapshot.total,
            remaining = snapshot.total - snapshot.cursor,
            cap = snapshot.concurrency_cap,
            interval = ?self.tick_interval,
            "batch runner started"
        );
        Ok(())
    }

    /// Halt the periodic tick.
    ///
    /// Active helper processes are abandoned, not terminated. Safe to call
    /// when never started or already stopped.
    pub fn stop(&mut self) {
        let Some(timer) = self.timer.take() else {
            debug!("batch runner not running; ignoring stop");
            return;
        };

        // The loop may already have exited on its own after draining.
        let _ = timer.stop_tx.send(());

        let snapshot = self.snapshot();
        if snapshot.active > 0 {
            info!(
                active = snapshot.active,
                "batch runner stopped; active helper processes keep running"
            );
        } else {
            info!("batch runner stopped");
        }
    }

    /// Whether a timer task is currently driving ticks.
    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| !timer.task.is_finished())
    }

    pub fn is_drained(&self) -> bool {
        lock_core(&self.core).is_drained()
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        lock_core(&self.core).snapshot()
    }

    /// Receiver that flips to `true` once the runner has drained.
    pub fn subscribe_drained(&self) -> watch::Receiver<bool> {
        self.drained_tx.subscribe()
    }

    /// Wait until every item has been admitted and every started process has
    /// exited.
    ///
    /// Never resolves while the runner is stopped short of draining.
    pub async fn wait_drained(&self) {
        let mut rx = self.subscribe_drained();
        // The sender lives as long as `self`, so this only returns once drained.
        let _ = rx.wait_for(|drained| *drained).await;
    }
}

fn lock_core<S: Spawner>(core: &Mutex<BatchCore<S>>) -> MutexGuard<'_, BatchCore<S>> {
    // A panicking spawner leaves the state itself consistent.
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn tick_loop<S: Spawner>(
    core: Arc<Mutex<BatchCore<S>>>,
    period: Duration,
    drained_tx: Arc<watch::Sender<bool>>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            // Fires on stop() and when the runner is dropped.
            _ = &mut stop_rx => {
                debug!("tick loop stopped");
                break;
            }

            _ = interval.tick() => {
                let report = lock_core(&core).tick();
                debug!(?report, "tick finished");

                if report.drained {
                    drained_tx.send_replace(true);
                    info!("batch runner drained; stopping timer");
                    break;
                }
            }
        }
    }
}
