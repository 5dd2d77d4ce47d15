//! bang-expand: prompt-submit hook that expands `` `! command` `` markers.
//!
//! Reads the hook JSON from stdin, runs each marker's command in the session
//! working directory, and prints the rewritten prompt inside an envelope.
//! The exit status is 0 on every path; failures surface as inline text or as
//! no output at all.

mod cli;
mod config;
mod envelope;
mod error;
mod expand;
mod hook;
mod input;
mod logging;
mod marker;
mod shell;

use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use config::ExpandConfig;
use shell::ShellRunner;
use std::process::ExitCode;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version go to stdout; anything else to stderr.
            let _ = err.print();
            if !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                eprintln!("bang-expand: ignoring invalid arguments, prompt left unchanged");
            }
            return ExitCode::SUCCESS;
        }
    };

    logging::init_logging(cli.verbose);

    let config = ExpandConfig::from_cli(&cli);
    let runner = ShellRunner::new(&config);
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    match hook::run(stdin, &mut stdout, &runner, &config, std::env::current_dir) {
        Ok(outcome) => debug!(?outcome, "hook finished"),
        Err(err) if err.is_silent() => debug!(error = %err, "hook input ignored"),
        Err(err) => warn!(error = %err, "hook failed; prompt left unchanged"),
    }

    ExitCode::SUCCESS
}
