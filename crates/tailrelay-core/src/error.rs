//! Log store error types.
//!
//! Store failures carry the operation that failed and the underlying
//! filesystem error, but never the log file path, so the message can be
//! shown to callers as-is.

use std::io;

use thiserror::Error;

/// Errors raised by mutating [`LogStore`](crate::LogStore) operations.
///
/// Reads never produce this error: a failed read degrades to an empty log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying filesystem operation failed (disk full, permissions, ...).
    #[error("Failed to {op} log file: {source}")]
    Io {
        /// Short verb describing the failed operation (`append to`, `clear`, `delete`).
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: &'static str, source: io::Error) -> Self {
        Self::Io { op, source }
    }

    /// The I/O error kind behind this failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io { source, .. } => source.kind(),
        }
    }
}
