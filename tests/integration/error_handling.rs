// tests/integration/error_handling.rs

use std::io::Write;

use autounlock::config::{load_and_validate, ConfigFile};
use autounlock::errors::AutounlockError;
use autounlock::types::GameKind;
use autounlock_test_utils::builders::{ConfigFileBuilder, GameBuilder};
use tempfile::NamedTempFile;

fn load(contents: &str) -> Result<ConfigFile, AutounlockError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    load_and_validate(file.path())
}

fn expect_config_error(result: Result<ConfigFile, AutounlockError>, needle: &str) {
    match result {
        Err(AutounlockError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {msg}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_batch_size_is_rejected() {
    let result = load(
        r#"
[runner]
batch_size = 0

[[game]]
id = 1
"#,
    );
    expect_config_error(result, "batch_size");
}

#[test]
fn zero_tick_interval_is_rejected() {
    let result = load(
        r#"
[runner]
tick_interval_ms = 0

[[game]]
id = 1
"#,
    );
    expect_config_error(result, "tick_interval_ms");
}

#[test]
fn negative_tick_interval_fails_to_parse() {
    let result = load(
        r#"
[runner]
tick_interval_ms = -5

[[game]]
id = 1
"#,
    );
    assert!(matches!(result, Err(AutounlockError::TomlError(_))));
}

#[test]
fn config_without_games_is_rejected() {
    let result = load(
        r#"
[runner]
batch_size = 2
"#,
    );
    expect_config_error(result, "at least one [[game]]");
}

#[test]
fn duplicate_game_ids_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_game(GameBuilder::new(440).build())
        .with_game(GameBuilder::new(570).build())
        .with_game(GameBuilder::new(440).name("again").build())
        .build_raw();

    expect_config_error(ConfigFile::try_from(raw), "440");
}

#[test]
fn empty_helper_program_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_game(GameBuilder::new(1).build())
        .with_helper("  ", &["{id}"])
        .build_raw();

    expect_config_error(ConfigFile::try_from(raw), "[helper].program");
}

#[test]
fn empty_kind_filter_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_game(GameBuilder::new(1).kind(GameKind::Demo).build())
        .with_kinds(&[])
        .build_raw();

    expect_config_error(ConfigFile::try_from(raw), "[filter].kinds");
}

#[test]
fn unknown_kind_fails_to_parse() {
    let result = load(
        r#"
[[game]]
id = 1
kind = "dlc"
"#,
    );
    assert!(matches!(result, Err(AutounlockError::TomlError(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(AutounlockError::IoError(_))));
}
