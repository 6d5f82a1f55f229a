// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AutounlockError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AutounlockError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.runner, raw.helper, raw.filter, raw.game,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_games(cfg)?;
    validate_runner(cfg)?;
    validate_helper(cfg)?;
    validate_filter(cfg)?;
    validate_unique_ids(cfg)?;
    Ok(())
}

fn ensure_has_games(cfg: &RawConfigFile) -> Result<()> {
    if cfg.game.is_empty() {
        return Err(AutounlockError::ConfigError(
            "config must contain at least one [[game]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.batch_size == 0 {
        return Err(AutounlockError::ConfigError(
            "[runner].batch_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.runner.tick_interval_ms == 0 {
        return Err(AutounlockError::ConfigError(
            "[runner].tick_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_helper(cfg: &RawConfigFile) -> Result<()> {
    if cfg.helper.program.trim().is_empty() {
        return Err(AutounlockError::ConfigError(
            "[helper].program must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_filter(cfg: &RawConfigFile) -> Result<()> {
    if let Some(kinds) = &cfg.filter.kinds {
        if kinds.is_empty() {
            return Err(AutounlockError::ConfigError(
                "[filter].kinds must list at least one kind (omit it to include all)".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_unique_ids(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for game in cfg.game.iter() {
        if !seen.insert(game.id) {
            return Err(AutounlockError::ConfigError(format!(
                "game {} is listed more than once",
                game.id
            )));
        }
    }
    Ok(())
}
