//! Router tests: every request is checked against the routing policy
//! without opening a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use tailrelay_axum::{RelayContext, create_router};
use tailrelay_core::{AckMode, BroadcastRegistry, DEFAULT_MAX_BODY_BYTES, LogStore};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

struct Fixture {
    _dir: TempDir,
    store: Arc<LogStore>,
    registry: BroadcastRegistry,
    app: Router,
}

fn fixture(ack_mode: AckMode) -> Fixture {
    fixture_with_limit(ack_mode, DEFAULT_MAX_BODY_BYTES)
}

fn fixture_with_limit(ack_mode: AckMode, max_body_bytes: usize) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LogStore::new(dir.path().join(".debug.log")));
    let registry = BroadcastRegistry::with_defaults();
    let state = Arc::new(RelayContext::new(
        Arc::clone(&store),
        registry.clone(),
        ack_mode,
        CancellationToken::new(),
    ));
    Fixture {
        _dir: dir,
        store,
        registry,
        app: create_router(state, max_body_bytes),
    }
}

fn request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_serves_viewer_without_side_effects() {
    let fx = fixture(AckMode::Bare);

    let response = fx
        .app
        .oneshot(request(Method::GET, "/", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"));
    let body = body_string(response).await;
    assert!(body.contains("EventSource(\"/events\")"));
    assert!(!fx.store.path().exists());
}

#[tokio::test]
async fn events_endpoint_returns_sse_stream() {
    let fx = fixture(AckMode::Bare);

    let response = fx
        .app
        .oneshot(request(Method::GET, "/events", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/event-stream"
    );
    assert_eq!(fx.registry.subscriber_count(), 1);

    drop(response);
    assert_eq!(fx.registry.subscriber_count(), 0);
}

#[tokio::test]
async fn post_to_root_is_ingested() {
    let fx = fixture(AckMode::Bare);
    let mut viewer = fx.registry.subscribe();

    let response = fx
        .app
        .oneshot(request(
            Method::POST,
            "/",
            "{\"hypothesis\":\"x is null\"}\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "");
    assert_eq!(fx.store.read_all().await, "{\"hypothesis\":\"x is null\"}\n");
    assert_eq!(
        viewer.recv().await.as_deref(),
        Some("{\"hypothesis\":\"x is null\"}")
    );
}

#[tokio::test]
async fn any_method_and_path_is_ingested() {
    let fx = fixture(AckMode::Bare);

    for (method, uri, body) in [
        (Method::PUT, "/some/where", "put line"),
        (Method::POST, "/events", "posted to events"),
        (Method::PATCH, "/", "patch line"),
        (Method::GET, "/other", "get with body"),
    ] {
        let response = fx
            .app
            .clone()
            .oneshot(request(method, uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(
        fx.store.read_all().await,
        "put line\nposted to events\npatch line\nget with body\n"
    );
}

#[tokio::test]
async fn blank_body_is_not_persisted_or_broadcast() {
    let fx = fixture(AckMode::Bare);
    let mut viewer = fx.registry.subscribe();

    let response = fx
        .app
        .oneshot(request(Method::POST, "/", "  \n\t "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!fx.store.path().exists());
    assert!(viewer.try_recv().is_none());
}

#[tokio::test]
async fn json_contract_acknowledges_valid_body() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .oneshot(request(Method::POST, "/", "{\"step\":3}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Log entry recorded");
    assert_eq!(fx.store.read_all().await, "{\"step\":3}\n");
}

#[tokio::test]
async fn json_contract_rejects_invalid_body() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .oneshot(request(Method::POST, "/", "not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "Invalid JSON");
    assert!(body["details"].is_string());
    assert_eq!(fx.store.read_all().await, "");
}

#[tokio::test]
async fn json_contract_rejects_other_methods() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .oneshot(request(Method::PUT, "/ingest", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "Method not allowed");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn json_contract_still_serves_viewer_and_events() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .clone()
        .oneshot(request(Method::GET, "/", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = fx
        .app
        .oneshot(request(Method::GET, "/events", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let fx = fixture(AckMode::Bare);

    let response = fx
        .app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
    assert!(!fx.store.path().exists());
}

#[tokio::test]
async fn head_requests_are_not_served_the_viewer() {
    let fx = fixture(AckMode::Bare);

    for uri in ["/", "/events"] {
        let response = fx
            .app
            .clone()
            .oneshot(request(Method::HEAD, uri, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(header::CONTENT_TYPE));
    }
    assert_eq!(fx.registry.subscriber_count(), 0);
    assert!(!fx.store.path().exists());
}

#[tokio::test]
async fn json_contract_rejects_head_on_viewer_route() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .oneshot(request(Method::HEAD, "/", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn json_contract_rejects_invalid_utf8_body() {
    let fx = fixture(AckMode::Json);

    let response = fx
        .app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/")
                .body(Body::from(&b"{\"a\":\"\xff\"}"[..]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "Invalid JSON");
    assert!(!fx.store.path().exists());
}

#[tokio::test]
async fn oversized_body_is_rejected_and_not_persisted() {
    let fx = fixture_with_limit(AckMode::Bare, 16);

    let response = fx
        .app
        .clone()
        .oneshot(request(Method::POST, "/", &"x".repeat(64)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!fx.store.path().exists());

    let response = fx
        .app
        .oneshot(request(Method::POST, "/", "short line"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fx.store.read_all().await, "short line\n");
}
