//! Hook input parsing.
//!
//! The host writes a single JSON object to stdin. Only `prompt` and `cwd` are
//! consulted; every other field is ignored.

use crate::error::{HookError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// Raw hook input as sent by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    /// The submitted prompt text.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Session working directory.
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Hook input with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub prompt: String,
    pub cwd: String,
}

impl HookInput {
    /// Parse the hook input from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the whole stream and parse it as hook input.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(HookError::ReadInput)?;
        Self::from_json(&buf)
    }

    /// The prompt text, empty when absent.
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }

    /// Apply defaults: an absent prompt is empty, an absent cwd falls back to
    /// `ambient_cwd`, which is only consulted in that case.
    pub fn resolve<F>(self, ambient_cwd: F) -> Result<ResolvedInput>
    where
        F: FnOnce() -> std::io::Result<PathBuf>,
    {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => ambient_cwd()
                .map_err(HookError::CurrentDir)?
                .to_string_lossy()
                .into_owned(),
        };
        Ok(ResolvedInput {
            prompt: self.prompt.unwrap_or_default(),
            cwd,
        })
    }
}
