//! Hook orchestration: read input, guard, expand, emit.
//!
//! Generic over the reader, writer and command runner so the whole flow can
//! be exercised without touching the real process streams.

use crate::config::ExpandConfig;
use crate::envelope;
use crate::error::{HookError, Result};
use crate::expand::{CommandRunner, expand_prompt};
use crate::input::HookInput;
use crate::marker::may_contain_marker;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// How a hook invocation ended. Every variant is a clean exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The prompt has no marker prefix; nothing was run.
    NoMarkers,
    /// Expansion ran but produced the original text; nothing was written.
    Unchanged,
    /// The envelope was written.
    Expanded,
}

/// Run one hook invocation.
///
/// `ambient_cwd` supplies the fallback working directory and is only called
/// when the input has no `cwd`.
pub fn run<R, W, C, F>(
    input: R,
    out: &mut W,
    runner: &C,
    config: &ExpandConfig,
    ambient_cwd: F,
) -> Result<HookOutcome>
where
    R: Read,
    W: Write,
    C: CommandRunner,
    F: FnOnce() -> std::io::Result<PathBuf>,
{
    let input = HookInput::from_reader(input)?;

    if !may_contain_marker(input.prompt()) {
        debug!("no marker prefix in prompt");
        return Ok(HookOutcome::NoMarkers);
    }

    let resolved = input.resolve(ambient_cwd)?;
    let expanded = expand_prompt(&resolved.prompt, &resolved.cwd, runner, config);

    let written =
        envelope::emit(out, &resolved.prompt, &expanded).map_err(HookError::WriteOutput)?;
    if written {
        info!(cwd = %resolved.cwd, "prompt expanded");
        Ok(HookOutcome::Expanded)
    } else {
        debug!("expansion left prompt unchanged");
        Ok(HookOutcome::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::CommandOutcome;

    /// Echoes the command back, uppercased, and counts calls.
    #[derive(Default)]
    struct Upper {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Upper {
        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl CommandRunner for Upper {
        fn run(&self, cwd: &str, command: &str) -> CommandOutcome {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            CommandOutcome::Output(format!("{}:{}", cwd, command.to_uppercase()))
        }
    }

    fn ambient() -> std::io::Result<PathBuf> {
        Ok(PathBuf::from("/ambient"))
    }

    fn run_hook(json: &str, runner: &Upper) -> (Result<HookOutcome>, String) {
        let mut out = Vec::new();
        let result = run(
            json.as_bytes(),
            &mut out,
            runner,
            &ExpandConfig::default(),
            ambient,
        );
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn expands_and_wraps_prompt() {
        let runner = Upper::default();
        let (result, out) = run_hook(r#"{"prompt": "Check `! echo hi`", "cwd": "/tmp"}"#, &runner);
        assert_eq!(result.unwrap(), HookOutcome::Expanded);
        assert_eq!(
            out,
            "<user-prompt-submit-hook>\nCheck `/tmp:ECHO HI`\n</user-prompt-submit-hook>\n"
        );
    }

    #[test]
    fn falls_back_to_ambient_cwd() {
        let runner = Upper::default();
        let (_, out) = run_hook(r#"{"prompt": "`! pwd`"}"#, &runner);
        assert!(out.contains("`/ambient:PWD`"));
    }

    #[test]
    fn prompt_without_prefix_is_noop() {
        let runner = Upper::default();
        let (result, out) = run_hook(r#"{"prompt": "plain `code` here"}"#, &runner);
        assert_eq!(result.unwrap(), HookOutcome::NoMarkers);
        assert!(out.is_empty());
        assert_eq!(runner.calls(), 0);
    }

    #[test]
    fn missing_prompt_is_noop() {
        let runner = Upper::default();
        let (result, out) = run_hook(r#"{"cwd": "/tmp"}"#, &runner);
        assert_eq!(result.unwrap(), HookOutcome::NoMarkers);
        assert!(out.is_empty());
    }

    #[test]
    fn no_prefix_never_consults_ambient_cwd() {
        let mut out = Vec::new();
        let result = run(
            &br#"{"prompt": "nothing"}"#[..],
            &mut out,
            &Upper::default(),
            &ExpandConfig::default(),
            || Err(std::io::Error::other("no cwd")),
        );
        assert_eq!(result.unwrap(), HookOutcome::NoMarkers);
    }

    #[test]
    fn unterminated_marker_is_unchanged() {
        let runner = Upper::default();
        let (result, out) = run_hook(r#"{"prompt": "oops `! ls"}"#, &runner);
        assert_eq!(result.unwrap(), HookOutcome::Unchanged);
        assert!(out.is_empty());
        assert_eq!(runner.calls(), 0);
    }

    #[test]
    fn malformed_json_is_silent_error() {
        let runner = Upper::default();
        let (result, out) = run_hook("{\"prompt\": \"`! ls`\"", &runner);
        let err = result.unwrap_err();
        assert!(err.is_silent());
        assert!(out.is_empty());
        assert_eq!(runner.calls(), 0);
    }

    #[test]
    fn multiline_prompt_is_emitted_verbatim() {
        let runner = Upper::default();
        let (_, out) = run_hook(
            r#"{"prompt": "first\n`! a`\nlast", "cwd": "/w"}"#,
            &runner,
        );
        assert_eq!(
            out,
            "<user-prompt-submit-hook>\nfirst\n`/w:A`\nlast\n</user-prompt-submit-hook>\n"
        );
    }
}
