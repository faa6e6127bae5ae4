// src/presentation/http/middleware/correlation.rs
use crate::presentation::http::extractors::{CORRELATION_ID_HEADER, CorrelationId};
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

/// Resolves the request's correlation id, exposes it to handlers as a
/// request extension and echoes it back on the response.
pub async fn correlation_middleware(mut req: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_headers(req.headers());
    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id.as_str(),
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
    }
    response
}
