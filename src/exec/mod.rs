// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `Spawner` / `ProcessHandle` traits the batch
//!   core is written against, plus the `SpawnError` type.
//! - [`process`] contains `CommandSpawner`, the production implementation
//!   that starts the helper program with `tokio::process::Command`.

pub mod backend;
pub mod process;

pub use backend::{ProcessHandle, SpawnError, Spawner};
pub use process::{ChildHandle, CommandSpawner};
