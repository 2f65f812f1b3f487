use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::Value;
use stockbook_api::{
    app_router,
    config::AppConfig,
    middleware_helpers::{CsrfToken, CSRF_HEADER},
    services::ProductService,
    store::{JsonFileStore, ProductStore},
    AppState,
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper harness for spinning up an application backed by a JSON file
/// store in a scratch directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    data_file: PathBuf,
    _data_dir: Option<TempDir>,
}

impl TestApp {
    /// Construct a new test application with a fresh data file.
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create scratch dir for tests");
        let mut app = Self::with_data_file(&data_dir.path().join("products.json")).await;
        app._data_dir = Some(data_dir);
        app
    }

    /// Construct a test application over an existing data file path.
    /// The caller owns the directory, so a second app over the same path
    /// models a process restart.
    #[allow(dead_code)]
    pub async fn with_data_file(path: &Path) -> Self {
        let cfg = AppConfig::new("127.0.0.1".to_string(), 18_080, "test".to_string());

        let store: Arc<dyn ProductStore> = Arc::new(JsonFileStore::new(path.to_path_buf()));
        let products = Arc::new(ProductService::new(store.clone()));
        let csrf = CsrfToken::generate();

        let state = AppState {
            config: cfg,
            store,
            products,
            csrf,
        };
        let router = app_router(state.clone());

        Self {
            router,
            state,
            data_file: path.to_path_buf(),
            _data_dir: None,
        }
    }

    /// The path of the backing JSON file.
    #[allow(dead_code)]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// The CSRF token the app would inject into its page.
    #[allow(dead_code)]
    pub fn csrf_token(&self) -> &str {
        self.state.csrf.as_str()
    }

    /// Send a request against the router with an optional CSRF token header.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        csrf: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = csrf {
            builder = builder.header(CSRF_HEADER, token);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper sending the app's own CSRF token.
    pub async fn request_with_csrf(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let token = self.state.csrf.as_str().to_string();
        self.request(method, uri, body, Some(&token)).await
    }

    /// Send a request whose body is passed through verbatim, for exercising
    /// payloads that are not well-formed JSON.
    #[allow(dead_code)]
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: &str,
        csrf: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");

        if let Some(token) = csrf {
            builder = builder.header(CSRF_HEADER, token);
        }

        let request = builder
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is not valid json")
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn response_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("response body is not utf-8")
}
