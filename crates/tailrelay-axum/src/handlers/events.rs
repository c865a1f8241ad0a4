//! SSE events handler - live log streaming.
//!
//! Every connection is registered in the broadcast registry for as long as
//! it stays open. No history is replayed on connect.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;
use tracing::debug;

use crate::sse::subscription_stream;
use crate::state::AppState;

/// `GET /events` - subscribe to lines ingested from now on.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let subscription = state.registry.subscribe();
    debug!(
        subscriber = %subscription.id(),
        total = state.registry.subscriber_count(),
        "Viewer connected"
    );
    subscription_stream(subscription, state.shutdown.clone())
}
