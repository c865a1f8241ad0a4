//! Append-only log file.
//!
//! Format: newline-delimited raw text, one [`LogLine`] per line, no
//! enclosing structure.
//! ```text
//! {"hypothesis":"x is null"}
//! plain text works too
//! ```
//!
//! Every append is a single append-mode write of `line + "\n"` with no read
//! beforehand, so overlapping ingestions can never drop each other's lines.
//! Rewriting the file as a whole (e.g. as a JSON array) would reintroduce a
//! lost-update race and must not be done here.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::error::StoreError;
use crate::line::LogLine;

/// Persistent, append-only log on local storage.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    /// Serialises mutations so appends from parallel handlers stay whole.
    write_gate: Mutex<()>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line, creating the file if it does not exist yet.
    pub async fn append(&self, line: &LogLine) -> Result<(), StoreError> {
        let mut record = String::with_capacity(line.as_str().len() + 1);
        record.push_str(line.as_str());
        record.push('\n');

        let _gate = self.write_gate.lock().await;
        self.append_record(record.as_bytes()).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to append log line");
            StoreError::io("append to", e)
        })
    }

    async fn append_record(&self, record: &[u8]) -> io::Result<()> {
        self.ensure_parent().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record).await?;
        // tokio's File completes writes in the background; flush waits for them.
        file.flush().await
    }

    /// Full current contents of the log.
    ///
    /// A missing file is an empty log. Any other read failure is logged and
    /// also yields an empty log: a viewer must never fail because of a
    /// corrupted or vanished file.
    pub async fn read_all(&self) -> String {
        match fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read log file");
                String::new()
            }
        }
    }

    /// Truncate the log to zero length, creating it if absent.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;
        let result = async {
            self.ensure_parent().await?;
            fs::write(&self.path, b"").await
        }
        .await;

        result.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to clear log file");
            StoreError::io("clear", e)
        })?;
        debug!(path = %self.path.display(), "Log file cleared");
        Ok(())
    }

    /// Remove the log file (idempotent - no error if missing).
    pub async fn delete_file(&self) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Log file deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to delete log file");
                Err(StoreError::io("delete", e))
            }
        }
    }

    async fn ensure_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
            _ => Ok(()),
        }
    }
}
