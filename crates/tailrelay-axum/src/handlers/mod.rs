//! HTTP handlers.
//!
//! - `viewer` - static live-tail page at `GET /`
//! - `events` - SSE subscription at `GET /events`
//! - `ingest` - every other request: the body is a log line

pub mod events;
pub mod ingest;
pub mod viewer;
