//! CLI argument parsing for bang-expand.
//!
//! Uses clap derive macros. The hook host passes no arguments; every flag is
//! an operator override with a default matching the hook contract.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Expand `` `! command` `` markers in a submitted prompt.
///
/// Reads the hook JSON document from stdin. When at least one marker was
/// expanded, prints the rewritten prompt wrapped in a
/// `<user-prompt-submit-hook>` envelope; otherwise prints nothing.
/// Always exits 0.
#[derive(Parser, Debug)]
#[command(name = "bang-expand")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Per-command timeout in seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Run all marker commands concurrently instead of in order.
    #[arg(long)]
    pub parallel: bool,

    /// Shell interpreter used to run commands.
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Log to stderr; repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_without_arguments() {
        let cli = Cli::try_parse_from(["bang-expand"]).unwrap();
        assert_eq!(cli.timeout_secs, None);
        assert!(!cli.parallel);
        assert!(cli.shell.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn counts_verbosity() {
        let cli = Cli::try_parse_from(["bang-expand", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["bang-expand", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["bang-expand", "--nope"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
