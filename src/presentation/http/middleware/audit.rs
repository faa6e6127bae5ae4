// src/presentation/http/middleware/audit.rs
use crate::domain::audit::{
    AuditEventType, AuditResource, AuditResult, AuditSeverity, NewAuditEvent,
};
use crate::presentation::http::error::{UnhandledError, internal_error_response};
use crate::presentation::http::extractors::{CorrelationId, RequestActor};
use crate::presentation::http::state::HttpState;
use crate::telemetry::LogContext;
use axum::{Extension, extract::Request, middleware::Next, response::Response};
use serde_json::json;

/// Turns every unhandled failure (internal handler errors and caught panics)
/// into an error log, a critical `system.event` audit entry and a generic
/// 500 carrying the correlation id.
pub async fn error_audit_middleware(
    Extension(state): Extension<HttpState>,
    correlation_id: CorrelationId,
    RequestActor(actor): RequestActor,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let url = req.uri().to_string();

    let mut response = next.run(req).await;
    let Some(unhandled) = response.extensions_mut().remove::<UnhandledError>() else {
        return response;
    };

    let logger = state
        .logger
        .child(LogContext::correlated(correlation_id.as_str()));
    logger.error_message(
        "Unhandled error",
        &unhandled.message,
        Some(json!({
            "method": &method,
            "url": &url,
            "statusCode": response.status().as_u16(),
        })),
    );

    state.services.audit_logger().log_event(
        NewAuditEvent::new(
            AuditEventType::SystemEvent,
            AuditSeverity::Critical,
            AuditResource::new("system"),
            "error",
            AuditResult::Failure,
        )
        .with_actor(actor)
        .with_correlation_id(Some(correlation_id.as_str().to_owned()))
        .with_metadata(Some(json!({
            "error": unhandled.message,
            "url": url,
            "method": method,
            "correlationId": correlation_id.as_str(),
        }))),
    );

    internal_error_response(Some(correlation_id.0))
}
