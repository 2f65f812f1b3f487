//! Stockbook API Library
//!
//! This crate provides the core functionality for the Stockbook inventory API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod store;

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use middleware_helpers::CsrfToken;
use store::ProductStore;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn ProductStore>,
    pub products: Arc<services::ProductService>,
    pub csrf: CsrfToken,
}

// Common response wrapper for the status and health endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Builds the application router: the inventory page and its assets,
/// the product API, service endpoints, and the API docs.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/js/app.js", get(handlers::pages::app_js))
        .route("/css/app.css", get(handlers::pages::app_css))
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Product API
        .nest(
            "/products",
            handlers::products::products_routes(state.clone()),
        )
        .merge(openapi::swagger_ui())
        .with_state(state)
}

async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "stockbook-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    // Probe the backing store the same way the list endpoint reads it
    let storage_status = match state.store.read_all().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": storage_status,
        "checks": {
            "storage": storage_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
