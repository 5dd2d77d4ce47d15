//! Logging initialization.
//!
//! Stdout carries the hook protocol, so logs go to stderr only. The hook is
//! silent by default; `-v` flags or the `BANG_EXPAND_LOG` environment
//! variable (EnvFilter syntax) turn it on.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the verbosity flags.
pub const LOG_ENV_VAR: &str = "BANG_EXPAND_LOG";

/// Filter directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. Safe to call once per process.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    // Ignore a second initialization rather than failing the hook.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(verbose >= 2)
        .try_init();
}
