//! Route definitions and router construction.
//!
//! Routing policy, evaluated per request:
//! 1. `GET /` - viewer page
//! 2. `GET /events` - live SSE subscription
//! 3. anything else (any method, any path) - log ingestion

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the relay router.
///
/// Non-GET requests to `/` and `/events` fall through to ingestion rather
/// than getting `405`. axum serves `HEAD` from a `GET` route unless a `HEAD`
/// handler is set, so both routes set one explicitly. CORS is permissive so
/// instrumented browser code on any origin can post to the relay.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::viewer::page)
                .head(handlers::ingest::ingest)
                .fallback(handlers::ingest::ingest),
        )
        .route(
            "/events",
            get(handlers::events::stream)
                .head(handlers::ingest::ingest)
                .fallback(handlers::ingest::ingest),
        )
        .fallback(handlers::ingest::ingest)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
