//! Per-server request state.
//!
//! One `RelayContext` is built for each `start()` and shared by every
//! handler of that run.

use std::sync::Arc;

use tailrelay_core::{AckMode, BroadcastRegistry, LogStore};
use tokio_util::sync::CancellationToken;

/// Everything a request handler needs.
#[derive(Debug)]
pub struct RelayContext {
    /// Append-only log file.
    pub store: Arc<LogStore>,
    /// Live `/events` subscribers.
    pub registry: BroadcastRegistry,
    /// Ingestion response contract.
    pub ack_mode: AckMode,
    /// Cancelled when the server stops; ends every open event stream.
    pub shutdown: CancellationToken,
}

impl RelayContext {
    pub fn new(
        store: Arc<LogStore>,
        registry: BroadcastRegistry,
        ack_mode: AckMode,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            registry,
            ack_mode,
            shutdown,
        }
    }
}

/// Handler state as extracted by axum.
pub type AppState = Arc<RelayContext>;
