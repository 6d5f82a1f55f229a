// tests/integration/cli_overrides.rs

use std::io::Write;
use std::path::PathBuf;

use autounlock::cli::CliArgs;
use autounlock::errors::AutounlockError;
use autounlock::run;
use clap::Parser;
use tempfile::NamedTempFile;

fn config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[helper]
program = "true"

[[game]]
id = 440
name = "Team Fortress 2"
"#
    )
    .unwrap();
    file
}

fn dry_run_args(config: PathBuf) -> CliArgs {
    CliArgs {
        config,
        batch_size: None,
        interval_ms: None,
        log_level: None,
        dry_run: true,
    }
}

fn expect_config_error(result: anyhow::Result<()>, needle: &str) {
    let err = match result {
        Err(err) => err,
        Ok(()) => panic!("Expected error, got Ok"),
    };
    match err.downcast_ref::<AutounlockError>() {
        Some(AutounlockError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[tokio::test]
async fn dry_run_accepts_a_valid_config() {
    let file = config_file();

    let result = run(dry_run_args(file.path().to_path_buf())).await;

    assert!(result.is_ok(), "dry-run failed: {:?}", result.err());
}

#[tokio::test]
async fn dry_run_rejects_zero_batch_size_override() {
    let file = config_file();
    let args = CliArgs {
        batch_size: Some(0),
        ..dry_run_args(file.path().to_path_buf())
    };

    expect_config_error(run(args).await, "concurrency cap");
}

#[tokio::test]
async fn dry_run_rejects_zero_interval_override() {
    let file = config_file();
    let args = CliArgs {
        interval_ms: Some(0),
        ..dry_run_args(file.path().to_path_buf())
    };

    expect_config_error(run(args).await, "tick interval");
}

#[tokio::test]
async fn zero_batch_size_override_fails_the_same_without_dry_run() {
    let file = config_file();
    let args = CliArgs {
        batch_size: Some(0),
        dry_run: false,
        ..dry_run_args(file.path().to_path_buf())
    };

    expect_config_error(run(args).await, "concurrency cap");
}

#[test]
fn config_flag_defaults_to_autounlock_toml() {
    let args = CliArgs::parse_from(["autounlock"]);

    assert_eq!(args.config, PathBuf::from("Autounlock.toml"));
    assert_eq!(args.batch_size, None);
    assert!(!args.dry_run);
}
