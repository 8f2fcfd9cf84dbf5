// src/exec/batch.rs

//! The batch executor: a worker task runs commands sequentially while the
//! calling task supervises one collective wall-clock deadline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time;
use tracing::{debug, info, warn};

use crate::errors::{Result, SuiterunError};

use super::log::{CommandLog, SharedLog};
use super::process::{CapturedOutput, kill_process_group, spawn_in_group, wait_with_output};
use super::{BatchOutcome, CommandResult};

/// Cross-role state shared between the worker and the controller.
///
/// One mutex guards both fields so "check the abort flag, then publish the
/// spawned group" is atomic as a unit. The guard is never held across an
/// await.
#[derive(Debug, Default)]
struct Shared {
    /// Set by the controller when the deadline expires; checked by the worker
    /// before starting each command.
    abort: bool,
    /// Process group of the command currently in flight, if any. The worker
    /// publishes it at spawn and clears it once the process has exited.
    running: Option<i32>,
}

/// Results of one [`BatchExecutor::run`] call.
#[derive(Debug)]
pub struct BatchRun {
    pub outcome: BatchOutcome,
    /// One entry per command that ran to completion, in execution order; a
    /// strict prefix of the command list when the run was cut short.
    pub results: Vec<CommandResult>,
    /// One log per command that started (including a command the deadline
    /// killed mid-flight), when individual capture was requested.
    pub individual_logs: Vec<CommandLog>,
}

/// Runs an ordered list of shell commands under a single wall-clock deadline.
///
/// Commands run strictly sequentially; at most one OS process is in flight at
/// any instant. On deadline expiry the controller flips an abort flag shared
/// with the worker and SIGTERMs the in-flight command's process group; the
/// worker observes the flag, stops without starting further commands, and
/// hands back the results it had collected.
///
/// The same executor can be reused across calls with its command list and
/// flags swapped between phases; only the shared log carries state over from
/// one run to the next.
pub struct BatchExecutor {
    pub cmds: Vec<String>,
    /// Stop the batch after the first command with a nonzero exit.
    pub stop_on_first_failure: bool,
    /// Also write each command's framed output to a dedicated log.
    pub log_individual_cmds: bool,
    log: SharedLog,
}

impl BatchExecutor {
    pub fn new(cmds: Vec<String>, log: SharedLog, stop_on_first_failure: bool) -> Self {
        Self {
            cmds,
            stop_on_first_failure,
            log_individual_cmds: false,
            log,
        }
    }

    /// Run the whole batch, allowing `timeout_minutes` of wall-clock time
    /// collectively (fractions permitted).
    ///
    /// Always returns a [`BatchRun`] once the deadline has passed and the
    /// in-flight group has been signalled; partial results are never
    /// discarded. An empty batch trivially succeeds.
    pub async fn run(&self, timeout_minutes: f64) -> Result<BatchRun> {
        // `!(x > 0)` also rejects NaN, which Duration::from_secs_f64 would
        // panic on.
        if !(timeout_minutes > 0.0) {
            return Err(SuiterunError::InvalidTimeout(timeout_minutes));
        }
        let deadline = Duration::from_secs_f64(timeout_minutes * 60.0);

        let shared = Arc::new(Mutex::new(Shared::default()));
        let mut worker = tokio::spawn(run_commands(
            self.cmds.clone(),
            self.log.clone(),
            self.stop_on_first_failure,
            self.log_individual_cmds,
            Arc::clone(&shared),
        ));

        match time::timeout(deadline, &mut worker).await {
            Ok(joined) => joined?,
            Err(_elapsed) => {
                info!(timeout_minutes, "deadline expired; aborting batch");
                {
                    let mut state = shared.lock().unwrap();
                    state.abort = true;
                    if let Some(pgid) = state.running {
                        kill_process_group(pgid);
                    }
                }
                // Wait for the worker to observe the abort and hand back what
                // it collected. Unbounded: group termination is assumed to
                // take effect.
                worker.await?
            }
        }
    }
}

/// Worker role: run commands in order, capturing output and recording
/// results, until the batch ends, a failure stops it, or an abort is seen.
async fn run_commands(
    cmds: Vec<String>,
    log: SharedLog,
    stop_on_first_failure: bool,
    log_individual_cmds: bool,
    shared: Arc<Mutex<Shared>>,
) -> Result<BatchRun> {
    let mut outcome = BatchOutcome::AllSucceeded;
    let mut results = Vec::new();
    let mut individual_logs = Vec::new();

    for cmd in &cmds {
        // The abort check and the group publication happen under one guard so
        // a deadline firing in between cannot miss the new process.
        let spawned = {
            let mut state = shared.lock().unwrap();
            if state.abort {
                outcome = BatchOutcome::TimedOut;
                break;
            }
            match spawn_in_group(cmd) {
                Ok(child) => {
                    state.running = child.id().map(|pid| pid as i32);
                    Some(child)
                }
                Err(err) => {
                    warn!(cmd = %cmd, error = %err, "failed to spawn command");
                    None
                }
            }
        };

        let captured = match spawned {
            Some(child) => wait_with_output(child).await,
            // Spawn failure counts as a failed command, not a distinct error.
            None => CapturedOutput {
                stdout: String::new(),
                stderr: format!("failed to spawn command: {cmd}\n"),
                exit_code: Some(127),
            },
        };

        shared.lock().unwrap().running = None;

        let framed = frame_output(cmd, &captured);
        log.append(&framed)?;
        if log_individual_cmds {
            let mut individual = CommandLog::new()?;
            individual.append(&framed)?;
            individual_logs.push(individual);
        }

        let aborted = shared.lock().unwrap().abort;
        let killed = captured.exit_code.is_none();

        // A command the controller terminated keeps its log entries but
        // records no result, so the result list stays a prefix of the
        // commands that ran to completion. A command killed by an unrelated
        // signal is recorded and counts as a failure.
        if !(aborted && killed) {
            results.push(CommandResult {
                stdout: captured.stdout,
                stderr: captured.stderr,
                exit_code: captured.exit_code,
            });
        }

        if captured.exit_code != Some(0) && outcome == BatchOutcome::AllSucceeded {
            outcome = BatchOutcome::SomeFailed;
        }
        if aborted {
            outcome = BatchOutcome::TimedOut;
            break;
        }
        if outcome == BatchOutcome::SomeFailed && stop_on_first_failure {
            break;
        }
    }

    debug!(?outcome, results = results.len(), "worker finished");
    Ok(BatchRun {
        outcome,
        results,
        individual_logs,
    })
}

/// Frame one command's captured output for the logs.
fn frame_output(cmd: &str, captured: &CapturedOutput) -> String {
    format!(
        "Command:\n{cmd}\n\nStdout:\n{}\nStderr:\n{}\n",
        captured.stdout, captured.stderr
    )
}
