use std::{net::SocketAddr, sync::Arc};

use tokio::signal;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};
use tracing::info;

use stockbook_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Select the storage backend
    let store: Arc<dyn api::store::ProductStore> = if cfg.storage.is_memory() {
        info!("Using in-memory product store");
        Arc::new(api::store::MemoryStore::new())
    } else {
        let path = cfg.storage.data_path();
        info!(path = %path.display(), "Using JSON file product store");
        Arc::new(api::store::JsonFileStore::new(path))
    };

    let products = Arc::new(api::services::ProductService::new(store.clone()));

    // One token per process; the served page carries it to the browser
    let csrf = api::middleware_helpers::CsrfToken::generate();

    // Compose shared app state
    let app_state = api::AppState {
        config: cfg.clone(),
        store,
        products,
        csrf,
    };

    let app = api::app_router(app_state)
        // HTTP tracing layer for consistent request/response telemetry
        .layer(api::middleware_helpers::http_trace_layer())
        // Apply compression and timeouts
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(cfg.request_timeout()))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            api::middleware_helpers::request_id_middleware,
        ));

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    info!("🚀 stockbook-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
