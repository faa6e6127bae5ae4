// src/presentation/http/middleware/metrics.rs
use crate::presentation::http::state::HttpState;
use axum::{
    Extension,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

/// Route label for requests no route template matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Records count and latency per method, route template and status, and
/// tracks in-flight requests. Only 5xx responses count as errors.
pub async fn metrics_middleware(
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let metrics = state.metrics;
    let _in_flight = metrics.track_active_connection();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    metrics.record_http_request(
        &method,
        &route,
        status.as_u16(),
        started.elapsed().as_secs_f64(),
    );
    if status.is_server_error() {
        metrics.record_http_error(&method, &route, "server_error");
    }

    response
}
