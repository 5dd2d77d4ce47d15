//! Output envelope.
//!
//! A rewritten prompt is signalled to the host by wrapping it in
//! `<user-prompt-submit-hook>` tags, one per line.

use std::io::Write;

pub const OPEN_TAG: &str = "<user-prompt-submit-hook>";
pub const CLOSE_TAG: &str = "</user-prompt-submit-hook>";

/// Render the three-line envelope, newline-terminated.
pub fn render(expanded: &str) -> String {
    format!("{}\n{}\n{}\n", OPEN_TAG, expanded, CLOSE_TAG)
}

/// Write the envelope if expansion changed anything.
///
/// Returns whether anything was written.
pub fn emit<W: Write>(out: &mut W, original: &str, expanded: &str) -> std::io::Result<bool> {
    if expanded == original {
        return Ok(false);
    }
    out.write_all(render(expanded).as_bytes())?;
    out.flush()?;
    Ok(true)
}
