// src/exec/mod.rs

//! Batch execution of shell commands under one collective deadline.
//!
//! The executor runs two logical roles per [`BatchExecutor::run`] call:
//! - a *worker* task that spawns the commands strictly sequentially, each as
//!   the leader of its own process group, draining stdout/stderr while it
//!   waits;
//! - the calling task as *controller*, racing the deadline against worker
//!   completion and, on expiry, flipping a shared abort flag and SIGTERM-ing
//!   the in-flight process group before collecting whatever results the
//!   worker had already recorded.

pub mod batch;
pub mod log;
mod process;

pub use batch::{BatchExecutor, BatchRun};
pub use log::{CommandLog, SharedLog};

/// Terminal classification of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every command ran and exited zero.
    AllSucceeded,
    /// At least one command failed (nonzero or absent exit code).
    SomeFailed,
    /// The collective deadline expired before the batch finished.
    TimedOut,
}

/// Captured output and exit status of one command that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal instead of exiting.
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// A command passes only on an exit code of exactly zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
