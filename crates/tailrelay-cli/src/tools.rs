//! Lifecycle tools exposed to whoever drives the relay.
//!
//! Each tool runs one operation against the server or its log store and
//! answers with short human-readable text. Failures are part of the answer
//! rather than an `Err`, so a console session or an RPC shim can relay them
//! verbatim.
//!
//! `stop` always discards the log file after the server has stopped; the
//! server itself never touches the file on stop.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tailrelay_axum::{IngestionServer, ServerStatus};
use tailrelay_core::RelayConfig;
use tracing::warn;

/// Names accepted by [`RelayTools::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Start,
    Stop,
    Clear,
    Status,
    Read,
}

impl Tool {
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Stop,
        Self::Clear,
        Self::Status,
        Self::Read,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Clear => "clear",
            Self::Status => "status",
            Self::Read => "read",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "start the log collection server",
            Self::Stop => "stop the server and delete the log file",
            Self::Clear => "empty the log file, leaving the server running",
            Self::Status => "report whether the server is running",
            Self::Read => "print every captured line",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| format!("Unknown tool '{}'", s.trim()))
    }
}

/// One relay instance plus the tools that drive it.
#[derive(Debug)]
pub struct RelayTools {
    server: IngestionServer,
}

impl RelayTools {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            server: IngestionServer::new(config),
        }
    }

    pub const fn server(&self) -> &IngestionServer {
        &self.server
    }

    pub fn log_file(&self) -> &Path {
        self.server.store().path()
    }

    /// Run a tool by name.
    pub async fn run(&self, tool: Tool) -> String {
        match tool {
            Tool::Start => self.start().await,
            Tool::Stop => self.stop().await,
            Tool::Clear => self.clear().await,
            Tool::Status => self.status().await,
            Tool::Read => self.read().await,
        }
    }

    pub async fn start(&self) -> String {
        match self.server.start().await {
            Ok(addr) => format!(
                "Log collection server started on http://{addr} (log file: {}). \
                 Send log lines to any path; watch them live at http://{addr}/",
                self.log_file().display()
            ),
            Err(e) => format!("Failed to start log server: {e}"),
        }
    }

    /// Stop serving, then delete the log file.
    pub async fn stop(&self) -> String {
        if let Err(e) = self.server.stop().await {
            return format!("Failed to stop log server: {e}");
        }
        match self.server.store().delete_file().await {
            Ok(()) => {
                "Log collection server stopped and log file deleted successfully.".to_string()
            }
            Err(e) => {
                warn!("Server stopped but log file was not deleted: {e}");
                format!("Failed to stop log server: {e}")
            }
        }
    }

    /// Stop serving and keep the log file.
    pub async fn stop_keep_log(&self) -> String {
        match self.server.stop().await {
            Ok(()) => format!(
                "Log collection server stopped. Log file kept at {}.",
                self.log_file().display()
            ),
            Err(e) => format!("Failed to stop log server: {e}"),
        }
    }

    pub async fn clear(&self) -> String {
        match self.server.store().clear().await {
            Ok(()) => "Debug log file cleared successfully.".to_string(),
            Err(e) => format!("Failed to clear logs: {e}"),
        }
    }

    pub async fn status(&self) -> String {
        match self.server.status().await {
            ServerStatus::Running { address } => {
                format!("Log collection server is running on http://{address}")
            }
            ServerStatus::Stopped => "Log collection server is not running.".to_string(),
        }
    }

    pub async fn read(&self) -> String {
        let contents = self.server.store().read_all().await;
        if contents.is_empty() {
            "Debug log is empty.".to_string()
        } else {
            contents
        }
    }
}
