// src/config/model.rs

use serde::Deserialize;

use crate::engine::{DEFAULT_CONCURRENCY_CAP, DEFAULT_TICK_INTERVAL, RunnerOptions};
use crate::types::{GameId, GameKind, WorkItem};

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [runner]
/// batch_size = 50
/// tick_interval_ms = 200
///
/// [helper]
/// program = "SAM.Game.exe"
/// args = ["{id}", "1"]
///
/// [filter]
/// kinds = ["normal", "demo"]
///
/// [[game]]
/// id = 440
/// name = "Team Fortress 2"
/// ```
///
/// All sections except `[[game]]` are optional. Use
/// `ConfigFile::try_from(raw)` to validate it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,

    #[serde(default)]
    pub helper: HelperSection,

    #[serde(default)]
    pub filter: FilterSection,

    /// Games in start order.
    #[serde(default)]
    pub game: Vec<GameConfig>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] for callers that validated themselves).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub runner: RunnerSection,
    pub helper: HelperSection,
    pub filter: FilterSection,
    pub game: Vec<GameConfig>,
}

impl ConfigFile {
    pub fn new_unchecked(
        runner: RunnerSection,
        helper: HelperSection,
        filter: FilterSection,
        game: Vec<GameConfig>,
    ) -> Self {
        Self {
            runner,
            helper,
            filter,
            game,
        }
    }

    /// Work items for every game that passes the kind filter, in file order.
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.game
            .iter()
            .filter(|g| self.filter.includes(g.kind))
            .map(GameConfig::to_work_item)
            .collect()
    }

    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions::from_millis(self.runner.batch_size, self.runner.tick_interval_ms)
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// How many helper processes may run at the same time.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Milliseconds between two scheduling ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_batch_size() -> usize {
    DEFAULT_CONCURRENCY_CAP
}

fn default_tick_interval_ms() -> u64 {
    u64::try_from(DEFAULT_TICK_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// `[helper]` section: the program started once per game.
///
/// `{id}` and `{name}` inside `args` are replaced per game.
#[derive(Debug, Clone, Deserialize)]
pub struct HelperSection {
    #[serde(default = "default_helper_program")]
    pub program: String,

    #[serde(default = "default_helper_args")]
    pub args: Vec<String>,
}

fn default_helper_program() -> String {
    "SAM.Game.exe".to_string()
}

fn default_helper_args() -> Vec<String> {
    vec!["{id}".to_string(), "1".to_string()]
}

impl Default for HelperSection {
    fn default() -> Self {
        Self {
            program: default_helper_program(),
            args: default_helper_args(),
        }
    }
}

/// `[filter]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSection {
    /// Kinds to include. `None` includes every kind.
    #[serde(default)]
    pub kinds: Option<Vec<GameKind>>,
}

impl FilterSection {
    pub fn includes(&self, kind: GameKind) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// One `[[game]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub id: GameId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub kind: GameKind,
}

impl GameConfig {
    pub fn to_work_item(&self) -> WorkItem {
        WorkItem::new(self.id, self.name.clone()).with_kind(self.kind)
    }
}
