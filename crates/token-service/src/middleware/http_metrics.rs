//! HTTP metrics middleware.
//!
//! Records every response, including those produced by the framework before a
//! handler runs (unsupported media type, JSON rejections, 404, 405).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Record method, normalized path, status and duration of each request.
///
/// Applied as the outermost layer.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
