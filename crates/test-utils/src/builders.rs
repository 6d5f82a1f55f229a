#![allow(dead_code)]

use autounlock::config::{
    ConfigFile, FilterSection, GameConfig, HelperSection, RawConfigFile, RunnerSection,
};
use autounlock::types::{GameId, GameKind, WorkItem};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                runner: RunnerSection::default(),
                helper: HelperSection::default(),
                filter: FilterSection::default(),
                game: Vec::new(),
            },
        }
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.config.game.push(game);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.runner.batch_size = batch_size;
        self
    }

    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.config.runner.tick_interval_ms = ms;
        self
    }

    pub fn with_helper(mut self, program: &str, args: &[&str]) -> Self {
        self.config.helper = HelperSection {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        self
    }

    pub fn with_kinds(mut self, kinds: &[GameKind]) -> Self {
        self.config.filter.kinds = Some(kinds.to_vec());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `GameConfig`.
pub struct GameBuilder {
    game: GameConfig,
}

impl GameBuilder {
    pub fn new(id: GameId) -> Self {
        Self {
            game: GameConfig {
                id,
                name: String::new(),
                kind: GameKind::Normal,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.game.name = name.to_string();
        self
    }

    pub fn kind(mut self, kind: GameKind) -> Self {
        self.game.kind = kind;
        self
    }

    pub fn build(self) -> GameConfig {
        self.game
    }
}

/// Work items with ids `1..=names.len()` and the given names, in order.
pub fn named_items(names: &[&str]) -> Vec<WorkItem> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| WorkItem::new(i as GameId + 1, *name))
        .collect()
}

/// Work items with ids `1..=count` and generated names.
pub fn numbered_items(count: usize) -> Vec<WorkItem> {
    (1..=count)
        .map(|i| WorkItem::new(i as GameId, format!("game-{i}")))
        .collect()
}
