//! Log ingestion handler.
//!
//! Any request not routed elsewhere is a log line. The body is read in full,
//! trimmed, persisted and only then published, so a viewer never sees a line
//! that failed to persist.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::IgnoredAny;
use tailrelay_core::{AckMode, LogLine, StoreError};
use tracing::{debug, warn};

use crate::error::HttpError;
use crate::state::{AppState, RelayContext};

/// Success body of the structured acknowledgment contract.
#[derive(Debug, Serialize)]
struct Ack {
    success: bool,
    message: &'static str,
}

/// Fallback handler: ingest the request body as one log line.
pub async fn ingest(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    match state.ack_mode {
        AckMode::Bare => ingest_bare(&state, &body).await.into_response(),
        AckMode::Json => match ingest_json(&state, &method, &body).await {
            Ok(ack) => ack.into_response(),
            Err(e) => e.into_response(),
        },
    }
}

/// Fire-and-forget: always `200` with an empty body.
async fn ingest_bare(state: &RelayContext, body: &[u8]) -> StatusCode {
    let Some(line) = LogLine::from_bytes(body) else {
        debug!("Ignoring empty log payload");
        return StatusCode::OK;
    };

    if let Err(e) = record(state, &line).await {
        warn!("Log line not recorded: {e}");
    }
    StatusCode::OK
}

/// Structured acknowledgment: POST only, body must be JSON.
async fn ingest_json(
    state: &RelayContext,
    method: &Method,
    body: &[u8],
) -> Result<Json<Ack>, HttpError> {
    if *method != Method::POST {
        return Err(HttpError::MethodNotAllowed);
    }

    // JSON is UTF-8; a body that is not must be rejected, never repaired.
    let text =
        std::str::from_utf8(body).map_err(|e| HttpError::MalformedPayload(e.to_string()))?;
    serde_json::from_str::<IgnoredAny>(text.trim())
        .map_err(|e| HttpError::MalformedPayload(e.to_string()))?;

    // Valid JSON is never blank.
    let line = LogLine::new(text)
        .ok_or_else(|| HttpError::MalformedPayload("empty body".to_string()))?;

    record(state, &line).await.map_err(|e| {
        warn!("Log line not recorded: {e}");
        HttpError::Internal
    })?;

    Ok(Json(Ack {
        success: true,
        message: "Log entry recorded",
    }))
}

/// Persist, then fan out.
async fn record(state: &RelayContext, line: &LogLine) -> Result<(), StoreError> {
    state.store.append(line).await?;
    let delivered = state.registry.publish(line.as_str());
    debug!(bytes = line.as_str().len(), delivered, "Log line recorded");
    Ok(())
}
