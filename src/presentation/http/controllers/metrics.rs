// src/presentation/http/controllers/metrics.rs
use crate::presentation::http::error::HttpResult;
use crate::presentation::http::state::HttpState;
use crate::telemetry::metrics::CONTENT_TYPE;
use axum::{Extension, http::header};

#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus text exposition.", body = String, content_type = "text/plain")
    ),
    tag = "Observability"
)]
pub async fn metrics(
    Extension(state): Extension<HttpState>,
) -> HttpResult<([(header::HeaderName, &'static str); 1], String)> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
