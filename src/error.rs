//! Error types for the bang-expand hook.
//!
//! Uses thiserror for derive macros. None of these errors ever reach the hook
//! host as a failure: `main` logs them and exits cleanly.

use thiserror::Error;

/// Main error type for hook operations.
///
/// Per-command failures are not represented here; they are carried inline
/// as [`crate::expand::CommandOutcome`] values.
#[derive(Error, Debug)]
pub enum HookError {
    /// Standard input could not be read.
    #[error("failed to read hook input: {0}")]
    ReadInput(#[source] std::io::Error),

    /// Standard input was not a JSON object of the expected shape.
    #[error("hook input is not a valid JSON document: {0}")]
    InvalidInput(#[from] serde_json::Error),

    /// The process working directory could not be resolved as a `cwd` fallback.
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// The envelope could not be written to standard output.
    #[error("failed to write hook output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl HookError {
    /// Returns true for conditions that are an expected no-op rather than a fault.
    ///
    /// Malformed input is routine (the host may send anything), so it is not
    /// worth a warning.
    pub fn is_silent(&self) -> bool {
        matches!(self, HookError::InvalidInput(_))
    }
}

/// Result type alias for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;
