// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{audit, health, metrics, root};
use crate::presentation::http::error::{UnhandledError, internal_error_response};
use crate::presentation::http::middleware::{
    correlation_middleware, error_audit_middleware, metrics_middleware,
};
use crate::presentation::http::openapi;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method},
    middleware,
    response::Response,
    routing::{get, post},
};
use std::any::Any;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{self, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn routes() -> Router {
    Router::new()
        .route("/", get(root::service_descriptor))
        .route("/health", get(health::health))
        .route("/health/liveness", get(health::liveness))
        .route("/health/readiness", get(health::readiness))
        .route("/metrics", get(metrics::metrics))
        .route("/audit/export", get(audit::export_audit_log))
        .route("/audit/retention", get(audit::retention_policy))
        .route("/audit/cleanup", post(audit::cleanup))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi))
}

pub fn build_router(state: HttpState) -> Router {
    apply_layers(routes(), state)
}

/// Innermost first: panic capture, error auditing, metrics, correlation,
/// tracing, compression, CORS, then the shared state every layer above
/// reads.
pub fn apply_layers(router: Router, state: HttpState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(error_audit_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any)
        .max_age(Duration::from_secs(3600));

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(cors::Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else {
        "handler panicked".to_string()
    };

    let mut response = internal_error_response(None);
    response.extensions_mut().insert(UnhandledError {
        message: format!("panic: {message}"),
    });
    response
}
