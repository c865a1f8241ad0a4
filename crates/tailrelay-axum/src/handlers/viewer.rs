//! Static viewer page.

use axum::response::Html;

/// The live-tail page. It only opens `/events` and renders each event.
pub const VIEWER_HTML: &str = include_str!("../../assets/viewer.html");

/// `GET /` - serve the viewer page. No side effects.
pub async fn page() -> Html<&'static str> {
    Html(VIEWER_HTML)
}
