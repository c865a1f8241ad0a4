//! Ingestion server lifecycle.
//!
//! The `IngestionServer` owns its log store, broadcast registry and serve
//! task. Lifecycle is `Stopped -> Running -> Stopped` with no intermediate
//! states visible to callers:
//! - **Bind-then-report**: the listener is bound before `start()` returns and
//!   the handle lock is held across the bind, so nobody observes `Running`
//!   without a listening socket, or `Stopped` while a bind is pending.
//! - **Streams end on stop**: open `/events` streams are tied to the server's
//!   cancellation token, so graceful shutdown never waits on idle viewers.
//! - **Store untouched**: stopping never clears or deletes the log file.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tailrelay_core::{BroadcastRegistry, LogStore, RelayConfig};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::ServerError;
use crate::routes::create_router;
use crate::state::RelayContext;

/// Handle to a running serve task.
struct ServerHandle {
    /// Cancellation token for graceful shutdown.
    cancel_token: CancellationToken,
    /// Join handle for the serve task.
    join_handle: JoinHandle<io::Result<()>>,
    /// Address the listener is bound to.
    bound_addr: SocketAddr,
}

/// Status of the ingestion server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Not serving.
    Stopped,
    /// Accepting connections.
    Running {
        /// Address the server is listening on.
        address: SocketAddr,
    },
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Running { address } => write!(f, "Running on {address}"),
        }
    }
}

/// Log ingestion and live-tail server.
///
/// # Example
///
/// ```ignore
/// let server = IngestionServer::new(RelayConfig::with_defaults());
/// let addr = server.start().await?;
/// println!("Status: {}", server.status().await);
/// server.stop().await?;
/// server.store().delete_file().await?;
/// ```
pub struct IngestionServer {
    config: RelayConfig,
    store: Arc<LogStore>,
    registry: BroadcastRegistry,
    /// Serve task, if any. Held across bind in `start()`.
    handle: Mutex<Option<ServerHandle>>,
}

impl IngestionServer {
    /// Create a stopped server for `config`.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        let store = Arc::new(LogStore::new(config.log_file.clone()));
        let registry = BroadcastRegistry::new(config.subscriber_buffer);
        Self {
            config,
            store,
            registry,
            handle: Mutex::new(None),
        }
    }

    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The log store this server appends to.
    pub const fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// The live subscriber registry.
    pub const fn registry(&self) -> &BroadcastRegistry {
        &self.registry
    }

    /// Start serving.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` if serving (no second bind is attempted), `PortInUse`
    /// if the port is taken, `Bind` for any other bind failure.
    pub async fn start(&self) -> Result<SocketAddr, ServerError> {
        let mut guard = self.handle.lock().await;

        if let Some(old) = guard.take() {
            if !old.join_handle.is_finished() {
                let addr = old.bound_addr;
                *guard = Some(old);
                return Err(ServerError::AlreadyRunning(addr));
            }
            match old.join_handle.await {
                Ok(Ok(())) => debug!("Previous serve task completed normally"),
                Ok(Err(e)) => warn!("Previous serve task ended with error: {e}"),
                Err(e) => warn!("Previous serve task panicked: {e}"),
            }
        }

        // Bind before spawning so the reported address is live.
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ServerError::from_bind(&bind_addr, self.config.port, &e))?;

        let bound_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(format!("Failed to get local address: {e}")))?;

        let cancel_token = CancellationToken::new();
        let context = Arc::new(RelayContext::new(
            Arc::clone(&self.store),
            self.registry.clone(),
            self.config.ack_mode,
            cancel_token.clone(),
        ));
        let app = create_router(context, self.config.max_body_bytes);
        let shutdown = cancel_token.clone().cancelled_owned();

        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
        });

        info!(
            addr = %bound_addr,
            log_file = %self.store.path().display(),
            ack_mode = %self.config.ack_mode,
            "Log server listening"
        );

        *guard = Some(ServerHandle {
            cancel_token,
            join_handle,
            bound_addr,
        });

        Ok(bound_addr)
    }

    /// Stop serving.
    ///
    /// Closes the listener, ends open event streams and waits for in-flight
    /// requests. If the serve task does not finish within the configured
    /// shutdown timeout it is aborted. The log file is left as is.
    ///
    /// # Errors
    ///
    /// `NotRunning` if nothing is serving.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let mut guard = self.handle.lock().await;

        let Some(handle) = guard.take() else {
            return Err(ServerError::NotRunning);
        };

        if handle.join_handle.is_finished() && !handle.cancel_token.is_cancelled() {
            warn!("Serve task on {} had already exited", handle.bound_addr);
            return Err(ServerError::NotRunning);
        }

        info!("Stopping log server on {}", handle.bound_addr);
        handle.cancel_token.cancel();

        // Borrow the handle for the timeout so it can still be aborted.
        let mut join = handle.join_handle;

        match tokio::time::timeout(self.config.shutdown_timeout, &mut join).await {
            Ok(Ok(Ok(()))) => {
                info!("Log server stopped cleanly");
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                error!("Serve task ended with error: {e}");
                Err(ServerError::Internal(format!("Server error: {e}")))
            }
            Ok(Err(join_err)) => {
                error!("Serve task panicked: {join_err}");
                Err(ServerError::Internal(format!(
                    "Task panicked: {join_err}"
                )))
            }
            Err(_) => {
                warn!("Log server stop timed out; aborting serve task");
                join.abort();
                // Wait for the abort so the listener is closed on return.
                let _ = join.await;
                Ok(())
            }
        }
    }

    /// Current lifecycle state.
    ///
    /// A serve task that exited on its own is reported as `Stopped` and its
    /// handle is reclaimed.
    pub async fn status(&self) -> ServerStatus {
        let mut guard = self.handle.lock().await;

        let Some(handle) = guard.as_ref() else {
            return ServerStatus::Stopped;
        };

        if handle.join_handle.is_finished() {
            warn!("Detected exited serve task, cleaning up handle");
            *guard = None;
            ServerStatus::Stopped
        } else {
            ServerStatus::Running {
                address: handle.bound_addr,
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        matches!(self.status().await, ServerStatus::Running { .. })
    }

    /// Get the bound address if running.
    pub async fn bound_address(&self) -> Option<SocketAddr> {
        match self.status().await {
            ServerStatus::Running { address } => Some(address),
            ServerStatus::Stopped => None,
        }
    }
}

impl Drop for IngestionServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.cancel_token.cancel();
        }
    }
}

impl fmt::Debug for IngestionServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionServer")
            .field("bind", &self.config.bind_address())
            .field("log_file", &self.store.path())
            .finish_non_exhaustive()
    }
}
