//! Relay configuration.
//!
//! Plain configuration values with defaults matching the fixed localhost
//! port and process-relative log file the relay has always used. Adapters
//! (CLI flags, environment) build a [`RelayConfig`] and hand it to the server.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default bind host. The relay only ever listens on loopback by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default ingestion port.
pub const DEFAULT_PORT: u16 = 6969;

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "./.debug.log";

/// Default number of lines that may queue up for one slow subscriber.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 1024;

/// Default request body limit (matches axum's own default).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Response contract used by the ingestion endpoint.
///
/// The contract is fixed per server instance; it never varies per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AckMode {
    /// Fire-and-forget: every ingestion request gets `200` with an empty body.
    #[default]
    Bare,
    /// Structured acknowledgment: POST only, body must be JSON, responses
    /// carry a small JSON object describing the outcome.
    Json,
}

impl AckMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bare => "bare",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for AckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown ack mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ack mode '{0}' (expected 'bare' or 'json')")]
pub struct ParseAckModeError(String);

impl FromStr for AckMode {
    type Err = ParseAckModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(Self::Bare),
            "json" => Ok(Self::Json),
            other => Err(ParseAckModeError(other.to_string())),
        }
    }
}

/// Configuration for one relay instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to (0 for OS-assigned, used by tests).
    pub port: u16,
    /// Append-only log file.
    pub log_file: PathBuf,
    /// Ingestion response contract.
    pub ack_mode: AckMode,
    /// Pending-line capacity per live subscriber.
    pub subscriber_buffer: usize,
    /// Largest accepted ingestion body.
    pub max_body_bytes: usize,
    /// How long `stop()` waits for the serve task before aborting it.
    pub shutdown_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RelayConfig {
    /// Create config with the standard port and log file.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            ack_mode: AckMode::default(),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    #[must_use]
    pub const fn with_ack_mode(mut self, mode: AckMode) -> Self {
        self.ack_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_subscriber_buffer(mut self, capacity: usize) -> Self {
        self.subscriber_buffer = capacity;
        self
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
