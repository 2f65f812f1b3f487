use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tracing::warn;

use crate::{errors::ServiceError, AppState};

/// Header carrying the CSRF token on mutating requests
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_LENGTH: usize = 32;

/// Per-process CSRF token.
///
/// Minted once at startup and injected into the served page, so only
/// requests originating from the page carry a matching header. A
/// restart invalidates tokens held by open tabs.
#[derive(Clone, Debug)]
pub struct CsrfToken(Arc<String>);

impl CsrfToken {
    /// Mints a fresh random token
    pub fn generate() -> Self {
        let token: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(Arc::new(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches(&self, candidate: &str) -> bool {
        self.0.as_str() == candidate
    }
}

/// Middleware rejecting mutating requests without the current CSRF token
pub async fn verify_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let presented = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(token) if state.csrf.matches(token) => Ok(next.run(request).await),
        Some(_) => {
            warn!(method = %request.method(), uri = %request.uri(), "Rejected request with stale CSRF token");
            Err(ServiceError::Forbidden("CSRF token mismatch".to_string()))
        }
        None => {
            warn!(method = %request.method(), uri = %request.uri(), "Rejected request without CSRF token");
            Err(ServiceError::Forbidden("CSRF token missing".to_string()))
        }
    }
}
