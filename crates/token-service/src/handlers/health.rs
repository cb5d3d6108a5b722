//! Liveness probe.
//!
//! The service has no downstream dependencies, so liveness is readiness.

/// `GET /health`
pub async fn health_check() -> &'static str {
    "OK"
}
