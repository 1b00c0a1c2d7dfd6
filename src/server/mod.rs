//! axum front for [`VisualMatcher`]: router, middleware and graceful shutdown.

pub mod error;
pub mod routes;

use crate::settings::Settings;
use crate::VisualMatcher;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Copy)]
pub struct RouterLimits {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl From<&Settings> for RouterLimits {
    fn from(s: &Settings) -> Self {
        Self {
            max_body_bytes: s.max_body_bytes(),
            request_timeout: s.request_timeout(),
        }
    }
}

impl Default for RouterLimits {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Routes:
/// - `GET /health`
/// - `GET /products`
/// - `GET /images/{*name}`
/// - `POST /match`
///
/// Anything else is a JSON 404.
pub fn build_router(matcher: Arc<VisualMatcher>, limits: RouterLimits) -> Router {
    // The browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/products", get(routes::products))
        .route("/images/{*name}", get(routes::image))
        .route("/match", post(routes::match_products))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(matcher)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings, matcher: VisualMatcher) -> anyhow::Result<()> {
    let addr = settings.socket_addr()?;
    let stats = matcher.stats();
    let app = build_router(Arc::new(matcher), RouterLimits::from(settings));

    tracing::info!(
        %addr,
        products = stats.total_items,
        embedded = stats.embedded_items,
        "starting visual-matcher"
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB",
        settings.request_timeout_secs,
        settings.max_body_mb
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
