// src/exec/process.rs

//! Spawning and supervising a single shell command.

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Captured output of one command, whether it exited or was killed.
#[derive(Debug)]
pub(crate) struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Build a shell command appropriate for the platform.
fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Spawn `cmd` through the system shell as the leader of a fresh process
/// group, so the shell and any children it forks can be signalled together.
pub(crate) fn spawn_in_group(cmd: &str) -> std::io::Result<Child> {
    let mut command = shell_command(cmd);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    unsafe {
        command.pre_exec(|| {
            // setpgid(0, 0) makes the spawned shell its own group leader.
            if libc::setpgid(0, 0) == 0 {
                Ok(())
            } else {
                Err(std::io::Error::last_os_error())
            }
        });
    }

    command.spawn()
}

/// Wait for the child to exit while draining both pipes concurrently, so a
/// command producing more output than the pipe buffers hold cannot stall.
///
/// The pipes reach EOF once every process holding them has died, including
/// children of a signalled group, so partial output written before a forced
/// termination is still captured.
pub(crate) async fn wait_with_output(mut child: Child) -> CapturedOutput {
    let stdout_task = tokio::spawn(drain(child.stdout.take()));
    let stderr_task = tokio::spawn(drain(child.stderr.take()));

    let exit_code = match child.wait().await {
        Ok(status) => {
            debug!(exit_code = ?status.code(), success = status.success(), "process exited");
            status.code()
        }
        Err(err) => {
            warn!(error = %err, "failed to wait for process");
            None
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    CapturedOutput {
        stdout,
        stderr,
        exit_code,
    }
}

async fn drain<R>(pipe: Option<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    // Keep whatever arrived before a read error (e.g. the group being killed).
    let _ = pipe.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

/// Best-effort SIGTERM to a whole process group.
///
/// ESRCH means the group already exited, which is fine; other failures are
/// logged and swallowed so the controller can still report a timeout.
#[cfg(unix)]
pub(crate) fn kill_process_group(pgid: i32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
        Ok(()) => debug!(pgid, "sent SIGTERM to process group"),
        Err(Errno::ESRCH) => debug!(pgid, "process group already gone"),
        Err(err) => warn!(pgid, error = %err, "failed to signal process group"),
    }
}

/// Group-wide termination needs process-group semantics; elsewhere the
/// in-flight child is only reaped via `kill_on_drop`.
#[cfg(not(unix))]
pub(crate) fn kill_process_group(pgid: i32) {
    warn!(pgid, "process-group termination is not supported on this platform");
}
