// src/exec/backend.rs

//! Pluggable spawn backend abstraction.
//!
//! The batch core never touches `std::process` or Tokio directly. It talks to
//! a [`Spawner`] that turns a [`WorkItem`] into a [`ProcessHandle`], and polls
//! those handles to find out when a process has exited.
//!
//! - [`CommandSpawner`](super::CommandSpawner) is the production
//!   implementation and launches the configured helper program.
//! - Tests provide their own `Spawner` with scripted process lifetimes.

use thiserror::Error;

use crate::types::{GameId, WorkItem};

/// A process for one work item could not be created.
///
/// The runner recovers from this locally: the item is logged, counted and
/// skipped. It is never retried.
#[derive(Error, Debug)]
#[error("failed to start helper for game {id}: {reason}")]
pub struct SpawnError {
    pub id: GameId,
    pub reason: String,
}

impl SpawnError {
    pub fn new(id: GameId, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

/// Handle to a running helper process.
///
/// Releasing the handle is `Drop`; implementations must not kill the
/// process when dropped.
pub trait ProcessHandle: Send + 'static {
    /// Non-blocking poll. Returns `true` once the process has exited.
    ///
    /// Implementations should report `true` when the process state can no
    /// longer be queried, otherwise the handle would hold a slot forever.
    fn has_exited(&mut self) -> bool;
}

/// Turns work items into running processes.
///
/// `spawn` is called from inside a tick and must return quickly.
pub trait Spawner: Send + 'static {
    type Handle: ProcessHandle;

    fn spawn(&mut self, item: &WorkItem) -> Result<Self::Handle, SpawnError>;
}
