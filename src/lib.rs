// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::engine::BatchRunner;
use crate::exec::CommandSpawner;
use crate::types::WorkItem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - kind filtering of the game list
/// - the helper process spawner
/// - the batch runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_and_validate(&args.config)?;
    apply_overrides(&mut cfg, &args);

    let items = cfg.work_items();
    let options = cfg.runner_options();
    options.validate()?;
    let spawner = CommandSpawner::from_helper(&cfg.helper);

    if args.dry_run {
        print_dry_run(&cfg, &spawner, &items);
        return Ok(());
    }

    if items.is_empty() {
        warn!(
            listed = cfg.game.len(),
            "no games left after applying [filter].kinds; nothing to do"
        );
        return Ok(());
    }

    info!(
        games = items.len(),
        skipped_by_filter = cfg.game.len() - items.len(),
        program = %spawner.program(),
        "starting helper processes"
    );

    let mut runner = BatchRunner::new(items, options, spawner)?;
    runner.start()?;

    let interrupted = tokio::select! {
        _ = runner.wait_drained() => false,
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => {
                info!("Ctrl+C received; stopping");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for Ctrl+C; waiting for completion");
                runner.wait_drained().await;
                false
            }
        },
    };

    // Helpers that are still running are left alone.
    if interrupted {
        runner.stop();
    }

    let snapshot = runner.snapshot();
    info!(
        started = snapshot.stats.started,
        failed = snapshot.stats.spawn_failures,
        ended = snapshot.stats.ended,
        still_running = snapshot.active,
        not_started = snapshot.total - snapshot.cursor,
        drained = snapshot.drained,
        "autounlock finished"
    );

    Ok(())
}

/// Apply `--batch-size` / `--interval-ms` on top of the file config.
///
/// The resulting options are validated again by `run`, before the dry-run
/// branch, so a `0` given on the command line is rejected either way.
fn apply_overrides(cfg: &mut ConfigFile, args: &CliArgs) {
    if let Some(batch_size) = args.batch_size {
        debug!(batch_size, "overriding [runner].batch_size from CLI");
        cfg.runner.batch_size = batch_size;
    }
    if let Some(interval_ms) = args.interval_ms {
        debug!(interval_ms, "overriding [runner].tick_interval_ms from CLI");
        cfg.runner.tick_interval_ms = interval_ms;
    }
}

/// Simple dry-run output: print runner settings, helper and games.
fn print_dry_run(cfg: &ConfigFile, spawner: &CommandSpawner, items: &[WorkItem]) {
    println!("autounlock dry-run");
    println!("  runner.batch_size = {}", cfg.runner.batch_size);
    println!("  runner.tick_interval_ms = {}", cfg.runner.tick_interval_ms);
    if let Some(ref kinds) = cfg.filter.kinds {
        let kinds: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
        println!("  filter.kinds = {:?}", kinds);
    }
    println!();

    println!(
        "games ({} of {} listed):",
        items.len(),
        cfg.game.len()
    );
    for item in items {
        println!("  - {item} [{}]", item.kind);
        println!(
            "      cmd: {} {}",
            spawner.program(),
            spawner.args_for(item).join(" ")
        );
    }

    debug!("dry-run complete (no processes started)");
}
