//! Resolved runtime configuration.
//!
//! The host runs the hook with no arguments, so [`ExpandConfig::default`] is
//! the behavior that matters; flags only override it.

use crate::cli::Cli;
use std::path::PathBuf;
use std::time::Duration;

/// Per-command timeout used when no flag overrides it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How marker commands are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One after another, in marker order.
    #[default]
    Sequential,
    /// All at once on scoped threads, each with its own timeout.
    Parallel,
}

/// Shell interpreter used to run the synthesized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub program: PathBuf,
    /// Flag that makes the interpreter execute its next argument as a command line.
    pub command_flag: String,
}

impl ShellSpec {
    /// Build a spec for a user-supplied interpreter path.
    pub fn for_program(program: PathBuf) -> Self {
        Self {
            program,
            command_flag: default_command_flag().to_string(),
        }
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        #[cfg(windows)]
        let program = PathBuf::from("cmd");
        #[cfg(not(windows))]
        let program = PathBuf::from("/bin/sh");

        Self::for_program(program)
    }
}

fn default_command_flag() -> &'static str {
    if cfg!(windows) { "/C" } else { "-c" }
}

/// Everything the expansion needs besides the input itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandConfig {
    pub timeout: Duration,
    pub dispatch: Dispatch,
    pub shell: ShellSpec,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dispatch: Dispatch::default(),
            shell: ShellSpec::default(),
        }
    }
}

impl ExpandConfig {
    /// Apply command-line overrides on top of the defaults.
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            timeout: cli
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            dispatch: if cli.parallel {
                Dispatch::Parallel
            } else {
                Dispatch::Sequential
            },
            shell: cli
                .shell
                .clone()
                .map(ShellSpec::for_program)
                .unwrap_or(defaults.shell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_match_hook_contract() {
        let config = ExpandConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.dispatch, Dispatch::Sequential);
    }

    #[cfg(unix)]
    #[test]
    fn default_shell_is_posix_sh() {
        let shell = ShellSpec::default();
        assert_eq!(shell.program, PathBuf::from("/bin/sh"));
        assert_eq!(shell.command_flag, "-c");
    }

    #[test]
    fn no_flags_yield_defaults() {
        let cli = Cli::parse_from(["bang-expand"]);
        assert_eq!(ExpandConfig::from_cli(&cli), ExpandConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "bang-expand",
            "--timeout-secs",
            "2",
            "--parallel",
            "--shell",
            "/bin/bash",
        ]);
        let config = ExpandConfig::from_cli(&cli);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.dispatch, Dispatch::Parallel);
        assert_eq!(config.shell.program, PathBuf::from("/bin/bash"));
    }
}
