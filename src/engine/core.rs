// src/engine/core.rs

//! Pure batch state machine.
//!
//! [`BatchCore`] owns the work queue (a cursor over the original item list),
//! the set of active process handles and the `admitted_all` / `drained`
//! flags. All of it is mutated only by [`BatchCore::tick`].
//!
//! There are no timers, channels or Tokio types in here. The async shell
//! (`engine::runner::BatchRunner`) decides *when* to tick; this module
//! decides *what* a tick does. Tests drive it directly, one tick at a time.

use std::fmt;

use tracing::{debug, info, warn};

use crate::errors::{AutounlockError, Result};
use crate::exec::{ProcessHandle, Spawner};
use crate::types::{GameId, WorkItem};

/// A handle the runner currently owns, plus the index of the item that
/// produced it (kept for logging only).
struct Active<H> {
    index: usize,
    handle: H,
}

/// Running totals over the lifetime of a core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub ticks: u64,
    pub started: usize,
    pub spawn_failures: usize,
    pub ended: usize,
}

/// What happened during one tick.
///
/// Purely diagnostic; nothing outside the core branches on it except the
/// shell, which stops its timer once `drained` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number, `0` for a tick on an already drained core.
    pub tick: u64,
    /// Items whose process was observed as exited, in scan order.
    pub ended: Vec<GameId>,
    /// Items admitted this tick, in admission order.
    pub started: Vec<GameId>,
    /// Items whose spawn failed this tick.
    pub failed: Vec<GameId>,
    /// Whether the core is drained after this tick.
    pub drained: bool,
}

/// Point-in-time view of the core state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSnapshot {
    pub cursor: usize,
    pub total: usize,
    pub active: usize,
    pub concurrency_cap: usize,
    pub admitted_all: bool,
    pub drained: bool,
    pub stats: RunnerStats,
}

pub struct BatchCore<S: Spawner> {
    items: Vec<WorkItem>,
    cursor: usize,
    active: Vec<Active<S::Handle>>,
    concurrency_cap: usize,
    admitted_all: bool,
    drained: bool,
    stats: RunnerStats,
    spawner: S,
}

impl<S: Spawner> fmt::Debug for BatchCore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCore")
            .field("items", &self.items.len())
            .field("cursor", &self.cursor)
            .field("active", &self.active.len())
            .field("concurrency_cap", &self.concurrency_cap)
            .field("admitted_all", &self.admitted_all)
            .field("drained", &self.drained)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<S: Spawner> BatchCore<S> {
    /// Create a core over `items`. The cap must be at least 1.
    pub fn new(items: Vec<WorkItem>, concurrency_cap: usize, spawner: S) -> Result<Self> {
        if concurrency_cap == 0 {
            return Err(AutounlockError::ConfigError(
                "concurrency cap must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(Self {
            items,
            cursor: 0,
            active: Vec::new(),
            concurrency_cap,
            admitted_all: false,
            drained: false,
            stats: RunnerStats::default(),
            spawner,
        })
    }

    /// The full item sequence, including items already admitted.
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Items currently holding a slot, in admission order.
    pub fn active_items(&self) -> Vec<&WorkItem> {
        self.active.iter().map(|a| &self.items[a.index]).collect()
    }

    pub fn is_admitted_all(&self) -> bool {
        self.admitted_all
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }

    pub fn stats(&self) -> RunnerStats {
        self.stats
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            cursor: self.cursor,
            total: self.items.len(),
            active: self.active.len(),
            concurrency_cap: self.concurrency_cap,
            admitted_all: self.admitted_all,
            drained: self.drained,
            stats: self.stats,
        }
    }

    /// Run one scheduling step: reap, check for completion, admit.
    ///
    /// A drained core is terminal; ticking it again changes nothing.
    pub fn tick(&mut self) -> TickReport {
        if self.drained {
            return TickReport {
                drained: true,
                ..TickReport::default()
            };
        }

        self.stats.ticks += 1;
        let mut report = TickReport {
            tick: self.stats.ticks,
            ..TickReport::default()
        };

        self.reap(&mut report);

        // Completion is only detected on a tick after the last admission, so
        // the final batch is always observed exiting on its own.
        if self.admitted_all && self.active.is_empty() {
            self.drained = true;
            report.drained = true;
            info!(
                ticks = self.stats.ticks,
                started = self.stats.started,
                failed = self.stats.spawn_failures,
                "all helper processes have exited"
            );
            return report;
        }

        self.admit(&mut report);
        report
    }

    fn reap(&mut self, report: &mut TickReport) {
        let items = &self.items;
        let ended = &mut report.ended;

        self.active.retain_mut(|active| {
            if !active.handle.has_exited() {
                return true;
            }
            let item = &items[active.index];
            info!(id = item.id, name = %item.name, "ended");
            ended.push(item.id);
            false
        });

        self.stats.ended += report.ended.len();
    }

    fn admit(&mut self, report: &mut TickReport) {
        while self.active.len() < self.concurrency_cap {
            let Some(item) = self.items.get(self.cursor) else {
                if !self.admitted_all {
                    debug!(total = self.items.len(), "all work items admitted");
                }
                self.admitted_all = true;
                break;
            };

            let index = self.cursor;
            self.cursor += 1;

            match self.spawner.spawn(item) {
                Ok(handle) => {
                    info!(
                        id = item.id,
                        name = %item.name,
                        kind = %item.kind,
                        active = self.active.len() + 1,
                        cap = self.concurrency_cap,
                        "started"
                    );
                    self.active.push(Active { index, handle });
                    self.stats.started += 1;
                    report.started.push(item.id);
                }
                Err(err) => {
                    warn!(id = item.id, name = %item.name, error = %err, "skipping game");
                    self.stats.spawn_failures += 1;
                    report.failed.push(item.id);
                }
            }
        }
    }
}
