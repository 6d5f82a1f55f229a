// src/engine/mod.rs

//! Batch scheduling engine.
//!
//! The pure state machine lives in [`core`]: one `tick()` reaps exited
//! helper processes, detects completion and admits new work items up to the
//! concurrency cap. The async shell in [`runner`] fires those ticks from a
//! Tokio interval and exposes `start()` / `stop()` / drained.

use std::time::Duration;

use crate::errors::{AutounlockError, Result};

/// Default number of helper processes allowed to run at the same time.
pub const DEFAULT_CONCURRENCY_CAP: usize = 50;

/// Default delay between two ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Runner configuration, validated when the runner is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Maximum number of helper processes alive at a tick boundary.
    pub concurrency_cap: usize,
    /// Delay between two ticks. Must be at least one millisecond.
    pub tick_interval: Duration,
}

impl RunnerOptions {
    pub fn new(concurrency_cap: usize, tick_interval: Duration) -> Self {
        Self {
            concurrency_cap,
            tick_interval,
        }
    }

    pub fn from_millis(concurrency_cap: usize, tick_interval_ms: u64) -> Self {
        Self::new(concurrency_cap, Duration::from_millis(tick_interval_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_cap == 0 {
            return Err(AutounlockError::ConfigError(
                "concurrency cap must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.tick_interval < Duration::from_millis(1) {
            return Err(AutounlockError::ConfigError(format!(
                "tick interval must be >= 1ms (got {:?})",
                self.tick_interval
            )));
        }
        Ok(())
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY_CAP, DEFAULT_TICK_INTERVAL)
    }
}

pub mod core;
pub mod runner;

pub use self::core::{BatchCore, RunnerSnapshot, RunnerStats, TickReport};
pub use self::runner::BatchRunner;
