//! Log line normalisation.
//!
//! A log line is whatever the instrumented client sent, with surrounding
//! whitespace removed. Its content is never parsed or reshaped.

use std::fmt;

/// A single non-empty, trimmed log payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogLine(String);

impl LogLine {
    /// Build a line from a text payload.
    ///
    /// Returns `None` when nothing is left after trimming; such payloads are
    /// neither persisted nor broadcast.
    pub fn new(payload: &str) -> Option<Self> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Build a line from a raw request body.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn from_bytes(payload: &[u8]) -> Option<Self> {
        Self::new(&String::from_utf8_lossy(payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
