//! ChatChill token service
//!
//! Issues RTC and messaging access tokens over HTTP.

use common::config::LogFormat;
use std::net::SocketAddr;
use std::sync::Arc;
use token_service::config::Config;
use token_service::observability::metrics::init_metrics_recorder;
use token_service::routes::{self, AppState};
use token_service::services::TokenIssuer;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration is loaded before tracing so LOG_FORMAT can pick the formatter
    let config = Config::from_env();

    let (log_filter, log_format) = match &config {
        Ok(c) => (
            c.observability.log_filter.clone(),
            c.observability.log_format,
        ),
        Err(_) => (
            "token_service=debug,tower_http=debug".to_string(),
            LogFormat::Text,
        ),
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());
    let registry = tracing_subscriber::registry().with(filter);
    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("Starting token service");

    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        app_id = %config.app_id,
        token_expire_seconds = config.token_expire_seconds,
        privilege_expire_seconds = config.privilege_expire_seconds,
        chat_token_expire_seconds = config.chat_token_expire_seconds,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let issuer = TokenIssuer::new(config.app_id.clone(), config.app_certificate.clone())
        .map_err(|e| {
            error!("Failed to create token issuer: {}", e);
            e
        })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        config,
        issuer: Arc::new(issuer),
    });

    let app = routes::build_routes(state, metrics_handle);

    info!("Token service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Token service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
