//! Inventory page and its assets, embedded at compile time with
//! `include_str!()` so the binary serves them without a document root.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/js/app.js");
const APP_CSS: &str = include_str!("../../static/css/app.css");

/// Placeholder substituted with the live token when the page is served
const CSRF_PLACEHOLDER: &str = "__CSRF_TOKEN__";

/// Serves the inventory page with the CSRF token injected
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_HTML.replace(CSRF_PLACEHOLDER, state.csrf.as_str()))
}

/// Serves the page script
pub async fn app_js() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    )
}

/// Serves the page stylesheet
pub async fn app_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], APP_CSS)
}
