// tests/integration/config_loading.rs

use std::io::Write;

use autounlock::config::{load_and_validate, parse_str, ConfigFile};
use autounlock::engine::RunnerOptions;
use autounlock::types::GameKind;
use autounlock_test_utils::builders::{ConfigFileBuilder, GameBuilder};
use tempfile::NamedTempFile;

#[test]
fn defaults_apply_when_sections_are_missing() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[game]]
id = 440
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.runner.batch_size, 50);
    assert_eq!(cfg.runner.tick_interval_ms, 200);
    assert_eq!(cfg.helper.program, "SAM.Game.exe");
    assert_eq!(cfg.helper.args, vec!["{id}", "1"]);
    assert!(cfg.filter.kinds.is_none());
    assert_eq!(cfg.runner_options(), RunnerOptions::default());

    let items = cfg.work_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 440);
    assert_eq!(items[0].name, "");
    assert_eq!(items[0].kind, GameKind::Normal);
}

#[test]
fn full_config_is_parsed_in_file_order() {
    let raw = parse_str(
        r#"
[runner]
batch_size = 4
tick_interval_ms = 50

[helper]
program = "/opt/sam/helper"
args = ["--app", "{id}"]

[[game]]
id = 70
name = "Half-Life"

[[game]]
id = 10
name = "Counter-Strike"
kind = "normal"

[[game]]
id = 901
name = "Some Demo"
kind = "demo"
"#,
    )
    .unwrap();
    let cfg = ConfigFile::try_from(raw).unwrap();

    assert_eq!(cfg.runner_options(), RunnerOptions::from_millis(4, 50));
    assert_eq!(cfg.helper.program, "/opt/sam/helper");

    let ids: Vec<_> = cfg.work_items().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![70, 10, 901]);
    assert_eq!(cfg.work_items()[2].kind, GameKind::Demo);
}

#[test]
fn kind_filter_keeps_only_listed_kinds_and_order() {
    let cfg = ConfigFileBuilder::new()
        .with_game(GameBuilder::new(1).name("game").build())
        .with_game(GameBuilder::new(2).name("junk").kind(GameKind::Junk).build())
        .with_game(GameBuilder::new(3).name("mod").kind(GameKind::Mod).build())
        .with_game(GameBuilder::new(4).name("other game").build())
        .with_kinds(&[GameKind::Normal, GameKind::Mod])
        .build();

    let ids: Vec<_> = cfg.work_items().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn filter_can_exclude_every_game() {
    let cfg = ConfigFileBuilder::new()
        .with_game(GameBuilder::new(1).build())
        .with_kinds(&[GameKind::Demo])
        .build();

    assert!(cfg.work_items().is_empty());
}

#[test]
fn game_kind_parses_from_str() {
    assert_eq!("Demo".parse::<GameKind>(), Ok(GameKind::Demo));
    assert_eq!("".parse::<GameKind>(), Ok(GameKind::Normal));
    assert!("dlc".parse::<GameKind>().is_err());
    assert_eq!(GameKind::Mod.to_string(), "mod");
}
