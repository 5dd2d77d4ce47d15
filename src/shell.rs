//! Shell execution for marker commands.
//!
//! Each command runs as `cd <cwd> && <command>` through the configured shell,
//! with stdout and stderr captured separately and a wall-clock timeout.
//! Neither `cwd` nor the command is quoted: both are executed as shell code.

use crate::config::{ExpandConfig, ShellSpec};
use crate::expand::{CommandOutcome, CommandRunner};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Synthesize the command line for one marker.
pub fn command_line(cwd: &str, command: &str) -> String {
    format!("cd {} && {}", cwd, command)
}

/// [`CommandRunner`] that spawns a real shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: ShellSpec,
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(config: &ExpandConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            timeout: config.timeout,
        }
    }

    fn execute(&self, line: &str) -> std::io::Result<CommandOutcome> {
        let mut command = Command::new(&self.shell.program);
        command
            .arg(&self.shell.command_flag)
            .arg(line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so a timeout can take down grandchildren too.
            command.process_group(0);
        }

        let deadline = deadline_after(self.timeout);
        let mut child = command.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let waited = wait_until(&mut child, deadline);
        if waited.is_err() {
            kill_process(&mut child);
        }
        let Some(status) = waited? else {
            kill_process(&mut child);
            return Ok(CommandOutcome::Timeout);
        };

        // A backgrounded grandchild can keep the pipes open after the shell exits.
        let (Some(out), Some(err)) = (stdout.collect(deadline), stderr.collect(deadline)) else {
            kill_process(&mut child);
            return Ok(CommandOutcome::Timeout);
        };

        debug!(code = ?status.code(), "shell exited");
        Ok(CommandOutcome::from_finished(
            status.success(),
            &String::from_utf8_lossy(&out),
            &String::from_utf8_lossy(&err),
        ))
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, cwd: &str, command: &str) -> CommandOutcome {
        match self.execute(&command_line(cwd, command)) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(shell = %self.shell.program.display(), error = %e, "failed to run shell");
                CommandOutcome::Error(e.to_string())
            }
        }
    }
}

/// Pipe contents gathered on a background thread.
struct Drain(Option<Receiver<Vec<u8>>>);

impl Drain {
    /// Wait for the reader to hit EOF, but not past `deadline`.
    ///
    /// Returns `None` if the pipe is still open at the deadline.
    fn collect(self, deadline: Option<Instant>) -> Option<Vec<u8>> {
        let Some(rx) = self.0 else {
            return Some(Vec::new());
        };
        let Some(deadline) = deadline else {
            return Some(rx.recv().unwrap_or_default());
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(bytes) => Some(bytes),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    Drain(pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error keeps whatever arrived before it.
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    }))
}

/// Deadline `timeout` from now, or `None` when it lies beyond what `Instant`
/// can represent.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    let deadline = Instant::now().checked_add(timeout);
    if deadline.is_none() {
        debug!(?timeout, "timeout too large, waiting without deadline");
    }
    deadline
}

/// Poll the child until it exits or the deadline passes.
///
/// Returns `None` on timeout. A `None` deadline waits indefinitely.
fn wait_until(
    child: &mut Child,
    deadline: Option<Instant>,
) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Ok(None);
                }
                POLL_INTERVAL.min(deadline - now)
            }
            None => POLL_INTERVAL,
        };
        thread::sleep(pause);
    }
}

/// Kill the shell and, on Unix, its whole process group.
///
/// Failures are logged, not returned.
fn kill_process(child: &mut Child) {
    debug!(pid = child.id(), "killing command");

    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
            debug!(pid = child.id(), error = %e, "failed to kill process group");
        }
    }

    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    if let Err(e) = child.kill() {
        debug!(pid = child.id(), error = %e, "failed to kill shell");
    }
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "failed to reap killed shell");
    }
}
