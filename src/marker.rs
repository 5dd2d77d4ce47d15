//! Command marker detection.
//!
//! A marker is `` `! <command>` ``: backtick, `!`, one space, one or more
//! non-backtick characters, closing backtick.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// The three characters every marker starts with.
pub const MARKER_PREFIX: &str = "`! ";

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`! ([^`]+)`").expect("Invalid marker regex"));

/// A marker located in the original prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte range of the whole marker, backticks included.
    pub span: Range<usize>,
    /// Command text with surrounding whitespace trimmed.
    pub command: String,
}

/// Cheap pre-check run before the regex. Never rejects a prompt that contains
/// a marker, but may admit prompts that contain none.
pub fn may_contain_marker(prompt: &str) -> bool {
    prompt.contains(MARKER_PREFIX)
}

/// Locate all non-overlapping markers, left to right.
pub fn find_markers(prompt: &str) -> Vec<Marker> {
    MARKER_REGEX
        .captures_iter(prompt)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let command = caps.get(1)?;
            Some(Marker {
                span: whole.range(),
                command: command.as_str().trim().to_string(),
            })
        })
        .collect()
}
