//! Marker expansion.
//!
//! Markers are located once in the original prompt, each command is run
//! through a [`CommandRunner`], and the prompt is rebuilt with every marker
//! replaced by its backtick-wrapped outcome. Replacement text is never
//! re-scanned.

use crate::config::{Dispatch, ExpandConfig};
use crate::marker::{Marker, find_markers};
use std::fmt;
use tracing::{debug, trace};

/// What running a single marker's command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Trimmed standard output.
    Output(String),
    /// Trimmed standard error of a failed command, or a spawn error description.
    Error(String),
    /// The command did not finish within the timeout.
    Timeout,
}

impl CommandOutcome {
    /// Build the outcome from a finished process.
    ///
    /// Stdout wins whenever it is non-empty, regardless of exit status.
    pub fn from_finished(success: bool, stdout: &str, stderr: &str) -> Self {
        let output = stdout.trim();
        if !success && output.is_empty() {
            CommandOutcome::Error(stderr.trim().to_string())
        } else {
            CommandOutcome::Output(output.to_string())
        }
    }

    /// Text placed between the backticks of the replacement.
    pub fn replacement_text(&self) -> String {
        match self {
            CommandOutcome::Output(text) => text.clone(),
            CommandOutcome::Error(detail) => format!("[error: {}]", detail),
            CommandOutcome::Timeout => "[timeout]".to_string(),
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.replacement_text())
    }
}

/// Runs one marker command in a working directory.
///
/// Implementations must never fail: every failure is folded into
/// [`CommandOutcome::Error`] or [`CommandOutcome::Timeout`].
pub trait CommandRunner: Sync {
    fn run(&self, cwd: &str, command: &str) -> CommandOutcome;
}

/// Expand every marker in `prompt`, running commands in `cwd`.
pub fn expand_prompt<R: CommandRunner>(
    prompt: &str,
    cwd: &str,
    runner: &R,
    config: &ExpandConfig,
) -> String {
    let markers = find_markers(prompt);
    if markers.is_empty() {
        return prompt.to_string();
    }
    debug!(count = markers.len(), dispatch = ?config.dispatch, "expanding markers");

    let outcomes = match config.dispatch {
        Dispatch::Sequential => run_sequential(&markers, cwd, runner),
        Dispatch::Parallel => run_parallel(&markers, cwd, runner),
    };

    assemble(prompt, &markers, &outcomes)
}

fn run_sequential<R: CommandRunner>(
    markers: &[Marker],
    cwd: &str,
    runner: &R,
) -> Vec<CommandOutcome> {
    markers.iter().map(|m| run_one(m, cwd, runner)).collect()
}

/// Each command keeps its own timeout; results are collected by marker index.
fn run_parallel<R: CommandRunner>(
    markers: &[Marker],
    cwd: &str,
    runner: &R,
) -> Vec<CommandOutcome> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = markers
            .iter()
            .map(|m| scope.spawn(move || run_one(m, cwd, runner)))
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| {
                    CommandOutcome::Error("command runner panicked".to_string())
                })
            })
            .collect()
    })
}

fn run_one<R: CommandRunner>(marker: &Marker, cwd: &str, runner: &R) -> CommandOutcome {
    debug!(command = %marker.command, "running marker command");
    let outcome = runner.run(cwd, &marker.command);
    trace!(command = %marker.command, ?outcome, "marker command finished");
    outcome
}

/// Rebuild the prompt, splicing outcomes into marker spans.
fn assemble(prompt: &str, markers: &[Marker], outcomes: &[CommandOutcome]) -> String {
    let mut result = String::with_capacity(prompt.len());
    let mut last = 0;

    for (marker, outcome) in markers.iter().zip(outcomes) {
        result.push_str(&prompt[last..marker.span.start]);
        result.push_str(&outcome.to_string());
        last = marker.span.end;
    }
    result.push_str(&prompt[last..]);
    result
}
