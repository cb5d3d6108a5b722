//! HTTP routes for the token service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::TokenIssuer;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Request timeout applied to every route.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration, resolved once at startup.
    pub config: Config,

    /// Issuer bound to the configured app id and certificate.
    pub issuer: Arc<TokenIssuer>,
}

/// Build the application routes.
///
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics
/// - `/api/token` - Media token (GET query or POST JSON)
/// - `/api/chat-token` - Messaging token
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/token",
            get(handlers::get_token).post(handlers::post_token),
        )
        .route("/api/chat-token", post(handlers::post_chat_token))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost, sees every response)
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn(http_metrics_middleware))
}
