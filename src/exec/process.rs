// src/exec/process.rs

//! Helper process spawner backed by `tokio::process::Command`.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::config::HelperSection;
use crate::exec::backend::{ProcessHandle, SpawnError, Spawner};
use crate::types::{GameId, WorkItem};

/// Placeholder replaced by the game id in helper arguments.
pub const ID_PLACEHOLDER: &str = "{id}";
/// Placeholder replaced by the game name in helper arguments.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Spawns the configured helper program once per work item.
///
/// Must be used from within a Tokio runtime (stderr of every child is drained
/// on a Tokio task).
#[derive(Debug, Clone)]
pub struct CommandSpawner {
    program: String,
    args: Vec<String>,
}

impl CommandSpawner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_helper(helper: &HelperSection) -> Self {
        Self::new(helper.program.clone(), helper.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Expand the argument template for a single item.
    pub fn args_for(&self, item: &WorkItem) -> Vec<String> {
        let id = item.id.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(ID_PLACEHOLDER, &id)
                    .replace(NAME_PLACEHOLDER, &item.name)
            })
            .collect()
    }
}

impl Spawner for CommandSpawner {
    type Handle = ChildHandle;

    fn spawn(&mut self, item: &WorkItem) -> Result<ChildHandle, SpawnError> {
        let args = self.args_for(item);
        debug!(id = item.id, program = %self.program, ?args, "spawning helper process");

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // Processes outlive the runner when it is stopped or dropped.
            .kill_on_drop(false);

        let mut child = cmd
            .spawn()
            .map_err(|e| SpawnError::new(item.id, format!("{}: {e}", self.program)))?;

        if let Some(stderr) = child.stderr.take() {
            let id = item.id;
            tokio::spawn(async move {
                let reader = BufReader::new(stderr);
                let mut lines = reader.lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(id, "stderr: {}", line);
                }
            });
        }

        debug!(id = item.id, pid = ?child.id(), "helper process started");
        Ok(ChildHandle { id: item.id, child })
    }
}

/// A running helper process.
#[derive(Debug)]
pub struct ChildHandle {
    id: GameId,
    child: Child,
}

impl ProcessHandle for ChildHandle {
    fn has_exited(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    id = self.id,
                    exit_code = status.code().unwrap_or(-1),
                    success = status.success(),
                    "helper process exited"
                );
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(id = self.id, error = %e, "failed to poll helper process; treating it as exited");
                true
            }
        }
    }
}
