//! Server lifecycle errors and HTTP error responses.
//!
//! `ServerError` covers start/stop of the ingestion server. `HttpError` is
//! only produced under the structured acknowledgment contract
//! ([`AckMode::Json`](tailrelay_core::AckMode::Json)); the bare contract
//! never reports failures to the client.

use std::io;
use std::net::SocketAddr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Error from server lifecycle operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `start()` while already serving. No second bind is attempted.
    #[error("Log server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    /// `stop()` while nothing is serving.
    #[error("Log server is not running")]
    NotRunning,

    /// The OS reports the address as already bound.
    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    /// Any other bind failure.
    #[error("Failed to bind to {address}: {reason}")]
    Bind { address: String, reason: String },

    /// Internal error (serve task failure, join failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Classify a bind failure for `address`.
    pub(crate) fn from_bind(address: &str, port: u16, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::AddrInUse {
            Self::PortInUse { port }
        } else {
            Self::Bind {
                address: address.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// Ingestion failures under the structured acknowledgment contract.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Body was not valid JSON.
    #[error("Invalid JSON: {0}")]
    MalformedPayload(String),

    /// Only POST ingests under this contract.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Persisting the line failed.
    #[error("Failed to record log entry")]
    Internal,
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MalformedPayload(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid JSON",
                    details: Some(details),
                },
            ),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody {
                    error: "Method not allowed",
                    details: None,
                },
            ),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Failed to record log entry",
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
