//! SSE framing for live log subscribers.
//!
//! Each published line becomes one event, `data: <line>\n\n`. The stream
//! lasts until the client disconnects (which drops the [`Subscription`] and
//! unregisters it) or the server shuts down.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream, StreamExt};
use tailrelay_core::Subscription;
use tokio_util::sync::CancellationToken;

/// Interval between keep-alive comments on idle streams.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Build the SSE event for one log line.
///
/// SSE fields cannot carry carriage returns, so `\r\n` and lone `\r` become
/// `\n`; a multi-line payload is sent as several `data:` fields of the same
/// event, which clients join back with `\n`.
pub fn event_for_line(line: &str) -> Event {
    if line.contains('\r') {
        Event::default().data(line.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Event::default().data(line)
    }
}

/// Turn a subscription into an SSE response that ends on `shutdown`.
pub fn subscription_stream(
    subscription: Subscription,
    shutdown: CancellationToken,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let lines = stream::unfold(subscription, |mut subscription| async move {
        subscription
            .recv()
            .await
            .map(|line| (line, subscription))
    });

    let events = lines
        .map(|line| Ok(event_for_line(&line)))
        .take_until(shutdown.cancelled_owned());

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use tailrelay_core::BroadcastRegistry;

    async fn next_frame(body: &mut Body) -> Option<String> {
        let frame = body.frame().await?.unwrap();
        let data = frame.into_data().unwrap();
        Some(String::from_utf8(data.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn each_line_is_one_event() {
        let registry = BroadcastRegistry::with_defaults();
        let shutdown = CancellationToken::new();
        let mut body = subscription_stream(registry.subscribe(), shutdown.clone())
            .into_response()
            .into_body();

        registry.publish("{\"hypothesis\":\"x is null\"}");
        assert_eq!(
            next_frame(&mut body).await.as_deref(),
            Some("data: {\"hypothesis\":\"x is null\"}\n\n")
        );

        registry.publish("second");
        assert_eq!(next_frame(&mut body).await.as_deref(), Some("data: second\n\n"));
    }

    #[tokio::test]
    async fn shutdown_ends_the_stream() {
        let registry = BroadcastRegistry::with_defaults();
        let shutdown = CancellationToken::new();
        let mut body = subscription_stream(registry.subscribe(), shutdown.clone())
            .into_response()
            .into_body();

        shutdown.cancel();

        assert_eq!(next_frame(&mut body).await, None);
        drop(body);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn carriage_returns_become_separate_data_fields() {
        let registry = BroadcastRegistry::with_defaults();
        let mut body = subscription_stream(registry.subscribe(), CancellationToken::new())
            .into_response()
            .into_body();

        registry.publish("line one\r\nline two\rline three");

        assert_eq!(
            next_frame(&mut body).await.as_deref(),
            Some("data: line one\ndata: line two\ndata: line three\n\n")
        );
    }

    #[tokio::test]
    async fn dropping_stream_unregisters_subscriber() {
        let registry = BroadcastRegistry::with_defaults();
        let sse = subscription_stream(registry.subscribe(), CancellationToken::new());
        assert_eq!(registry.subscriber_count(), 1);

        drop(sse);
        assert_eq!(registry.subscriber_count(), 0);
    }
}
