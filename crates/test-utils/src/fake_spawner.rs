use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use autounlock::exec::{ProcessHandle, SpawnError, Spawner};
use autounlock::types::{GameId, WorkItem};
use tracing::debug;

/// How long a fake process stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// `has_exited()` returns `true` from the n-th poll on (n = 1: the first
    /// reap after admission sees it exited).
    Polls(usize),
    /// Never exits.
    Hung,
}

/// Shared view of what a `FakeSpawner` did, usable after the spawner has
/// been moved into a runner.
#[derive(Debug, Clone, Default)]
pub struct SpawnRecorder {
    calls: Arc<Mutex<Vec<GameId>>>,
    alive: Arc<AtomicUsize>,
    max_alive: Arc<AtomicUsize>,
}

impl SpawnRecorder {
    /// Every id passed to `spawn`, including failed attempts, in call order.
    pub fn calls(&self) -> Vec<GameId> {
        self.calls.lock().unwrap().clone()
    }

    /// Fake processes that have not reported exit yet.
    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::SeqCst)
    }

    /// Highest `alive()` ever observed right after a spawn.
    pub fn max_alive(&self) -> usize {
        self.max_alive.load(Ordering::SeqCst)
    }
}

/// A spawner that never starts real processes.
///
/// - records every spawn call
/// - fails for configured ids
/// - hands out handles that exit after a scripted number of polls
#[derive(Debug, Clone)]
pub struct FakeSpawner {
    default_lifetime: Lifetime,
    lifetimes: HashMap<GameId, Lifetime>,
    failing: HashSet<GameId>,
    fail_all: bool,
    recorder: SpawnRecorder,
}

impl FakeSpawner {
    /// Every process exits on its first poll.
    pub fn new() -> Self {
        Self {
            default_lifetime: Lifetime::Polls(1),
            lifetimes: HashMap::new(),
            failing: HashSet::new(),
            fail_all: false,
            recorder: SpawnRecorder::default(),
        }
    }

    pub fn exits_after(mut self, polls: usize) -> Self {
        self.default_lifetime = Lifetime::Polls(polls);
        self
    }

    pub fn lifetime_of(mut self, id: GameId, lifetime: Lifetime) -> Self {
        self.lifetimes.insert(id, lifetime);
        self
    }

    pub fn failing(mut self, id: GameId) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn recorder(&self) -> SpawnRecorder {
        self.recorder.clone()
    }
}

impl Default for FakeSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner for FakeSpawner {
    type Handle = FakeHandle;

    fn spawn(&mut self, item: &WorkItem) -> Result<FakeHandle, SpawnError> {
        self.recorder.calls.lock().unwrap().push(item.id);

        if self.fail_all || self.failing.contains(&item.id) {
            debug!(id = item.id, "fake spawn failure");
            return Err(SpawnError::new(item.id, "scripted failure"));
        }

        let lifetime = self
            .lifetimes
            .get(&item.id)
            .copied()
            .unwrap_or(self.default_lifetime);

        let alive = self.recorder.alive.fetch_add(1, Ordering::SeqCst) + 1;
        self.recorder.max_alive.fetch_max(alive, Ordering::SeqCst);

        Ok(FakeHandle {
            remaining: match lifetime {
                Lifetime::Polls(n) => Some(n.max(1)),
                Lifetime::Hung => None,
            },
            exited: false,
            alive: Arc::clone(&self.recorder.alive),
        })
    }
}

#[derive(Debug)]
pub struct FakeHandle {
    remaining: Option<usize>,
    exited: bool,
    alive: Arc<AtomicUsize>,
}

impl ProcessHandle for FakeHandle {
    fn has_exited(&mut self) -> bool {
        if self.exited {
            return true;
        }
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= 1;
        if *remaining == 0 {
            self.exited = true;
            self.alive.fetch_sub(1, Ordering::SeqCst);
        }
        self.exited
    }
}
