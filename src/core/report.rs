//! Outcome reporting for https-dwnld
//!
//! Maps typed results to the status tokens printed by the CLI, and decodes
//! shown content for the console.

use std::io::Write;
use std::path::PathBuf;

use crate::core::error::Result;

/// Successful result of a download
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// File written to this path
    Saved(PathBuf),
    /// Body read for display
    Shown(Vec<u8>),
}

/// Final status token printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultToken {
    Completed,
    Shown,
    Error,
}

impl ResultToken {
    /// Token for the outcome of a whole download
    pub fn from_result(result: &Result<Outcome>) -> Self {
        match result {
            Ok(Outcome::Saved(_)) => ResultToken::Completed,
            Ok(Outcome::Shown(_)) => ResultToken::Shown,
            Err(_) => ResultToken::Error,
        }
    }

    /// Literal text printed for this token
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultToken::Completed => "Completed",
            ResultToken::Shown => "",
            ResultToken::Error => "Error",
        }
    }
}

impl std::fmt::Display for ResultToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console representation of a shown body
#[derive(Debug, PartialEq)]
pub enum Content<'a> {
    Text(&'a str),
    Raw(&'a [u8]),
}

/// UTF-8 text when possible, raw bytes otherwise
pub fn decode_content(bytes: &[u8]) -> Content<'_> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Content::Text(text),
        Err(_) => Content::Raw(bytes),
    }
}

/// Writes shown content without adding a trailing newline
pub fn write_content<W: Write>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    match decode_content(bytes) {
        Content::Text(text) => out.write_all(text.as_bytes())?,
        Content::Raw(raw) => {
            log::debug!("content is not valid UTF-8, writing {} raw bytes", raw.len());
            out.write_all(raw)?
        }
    }
    out.flush()
}
