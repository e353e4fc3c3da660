//! Climbing geo HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Context;
use application::ports::{CatalogPort, GeocodingPort};
use infrastructure::{
    AppConfig, CachedCatalogAdapter, DEFAULT_LOG_FILTER, GeocodingAdapter, JsonCatalogAdapter,
    LogFormat, init_logging,
};
use presentation_http::{
    AppState, routes, set_expose_internal_errors,
    shutdown::{serve_with_drain_timeout, wait_for_shutdown},
};
use tokio::{net::TcpListener, signal, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    let log_format: LogFormat = config.server.log_format.parse()?;
    init_logging(log_format, DEFAULT_LOG_FILTER)?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "climbing-geo starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        catalog = %config.catalog.path.display(),
        "Configuration loaded"
    );

    set_expose_internal_errors(config.server.expose_internal_errors);

    // Catalogue collaborator, optionally behind the snapshot cache
    let source = JsonCatalogAdapter::new(config.catalog.path.clone());
    let catalog: Arc<dyn CatalogPort> = match config.catalog.cache_ttl() {
        Some(ttl) => Arc::new(CachedCatalogAdapter::new(source, ttl)),
        None => Arc::new(source),
    };

    let geocoder: Arc<dyn GeocodingPort> = Arc::new(
        GeocodingAdapter::from_config(&config.geocoding)
            .context("failed to initialize geocoding clients")?,
    );

    if !catalog.is_available().await {
        warn!("Catalogue snapshot is not readable yet; /ready will report unavailable");
    }

    let state = AppState::new(catalog, geocoder, config.search.to_settings());
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let app = if config.server.cors_enabled {
        app.layer(cors_layer(&config.server.allowed_origins))
    } else {
        app
    };

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()))
        .into_future();
    serve_with_drain_timeout(serve, shutdown_rx, shutdown_timeout).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use axum::http::{HeaderValue, Method};

    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
