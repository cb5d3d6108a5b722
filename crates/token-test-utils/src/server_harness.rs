//! Test server harness for E2E testing
//!
//! Provides `TestTokenServer` for spawning real token service instances in tests.

use crate::fixtures::{test_clock, test_env_vars, test_issuer};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use token_service::clock::FixedClock;
use token_service::config::Config;
use token_service::routes::{self, AppState};
use tokio::task::JoinHandle;

/// Test harness for spawning the token service in E2E tests
///
/// The server's clock is a [`FixedClock`], so tokens it issues are
/// reproducible and tests can move time with [`TestTokenServer::clock`].
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_get_token() -> Result<()> {
///     let server = TestTokenServer::spawn().await?;
///     let response = reqwest::get(format!("{}/api/token?channelName=room42", server.url())).await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    config: Config,
    clock: Arc<FixedClock>,
    handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a server with the default test configuration.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a server with some environment variables overridden.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use a standalone Prometheus recorder (never installed globally)
    /// - Start the HTTP server in the background
    pub async fn spawn_with_vars(overrides: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let mut vars = test_env_vars();
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to build test config: {}", e))?;

        let clock = test_clock();
        let state = Arc::new(AppState {
            config: config.clone(),
            issuer: Arc::new(test_issuer(clock.clone())),
        });

        // Each server gets its own recorder handle; the global slot can only
        // be taken once per test process.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            clock,
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The clock the server issues tokens with
    pub fn clock(&self) -> &Arc<FixedClock> {
        &self.clock
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
