//! Metrics definitions for the token service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `token_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `variant`: 4 values (uid_role, explicit_privileges, user_account, chat)
//! - `status`: 2-3 values (success, error, timeout)
//! - `error_category`: 3 values (validation, cryptographic, internal)
//! - `reason`: bounded by validation error variants
//! - `endpoint`: known routes plus `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Signing is pure CPU work; sub-millisecond is normal
        .set_buckets_for_metric(
            Matcher::Prefix("token_issuance".to_string()),
            &[
                0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.010, 0.025, 0.050,
            ],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("token_http_request".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `token_issuance_duration_seconds`, `token_issuance_total`
/// Labels: `variant`, `status`
pub fn record_token_issuance(variant: &str, status: &str, duration: Duration) {
    histogram!("token_issuance_duration_seconds",
        "variant" => variant.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("token_issuance_total",
        "variant" => variant.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record token verification result
///
/// Metric: `token_validations_total`
/// Labels: `status`, `reason`
pub fn record_token_validation(status: &str, reason: Option<&str>) {
    let reason = reason.unwrap_or("none");
    counter!("token_validations_total",
        "status" => status.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record an error returned to a caller
///
/// Metric: `token_errors_total`
/// Labels: `operation`, `error_category`, `status_code`
pub fn record_error(operation: &str, error_category: &str, status_code: u16) {
    counter!("token_errors_total",
        "operation" => operation.to_string(),
        "error_category" => error_category.to_string(),
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `token_http_requests_total`, `token_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// This captures ALL HTTP responses including framework-level errors like
/// 415 (wrong Content-Type), 422 (JSON shape), 404 and 405.
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_path(path);
    let status = categorize_status_code(status_code);

    histogram!("token_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("token_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path to a bounded endpoint label.
///
/// Every route is static, so anything not served here becomes `/other`.
pub fn normalize_path(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/token" => "/api/token",
        "/api/chat-token" => "/api/chat-token",
        _ => "/other",
    }
}
