// src/presentation/http/openapi.rs
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::OpenApi;

pub const DEFAULT_SNAPSHOT_PATH: &str = "openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::root::service_descriptor,
        crate::presentation::http::controllers::health::health,
        crate::presentation::http::controllers::health::liveness,
        crate::presentation::http::controllers::health::readiness,
        crate::presentation::http::controllers::metrics::metrics,
        crate::presentation::http::controllers::audit::export_audit_log,
        crate::presentation::http::controllers::audit::retention_policy,
        crate::presentation::http::controllers::audit::cleanup
    ),
    components(
        schemas(
            crate::presentation::http::error::ErrorBody,
            crate::presentation::http::controllers::root::ServiceDescriptor,
            crate::presentation::http::controllers::root::EndpointMap,
            crate::application::dto::HealthCheckResult,
            crate::application::dto::CheckResult,
            crate::application::dto::LivenessReport,
            crate::application::dto::RetentionPolicyDto,
            crate::application::dto::CleanupResultDto,
            crate::domain::health::HealthStatus
        )
    ),
    tags(
        (name = "System", description = "Service identity"),
        (name = "Health", description = "Liveness, readiness and aggregate health"),
        (name = "Observability", description = "Prometheus metrics"),
        (name = "Audit", description = "Audit trail export and retention")
    ),
    info(
        title = "Compliance Core API",
        description = "Audit trail, health and metrics service"
    )
)]
pub struct ApiDoc;

/// The generated document, titled and versioned for the running service.
pub fn document(title: &str, version: &str) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.title = title.to_string();
    openapi.info.version = version.to_string();
    openapi
}

pub async fn serve_openapi(Extension(state): Extension<HttpState>) -> Json<utoipa::openapi::OpenApi> {
    Json(document(&state.service.name, &state.service.version))
}

/// Writes the document to `OPENAPI_SNAPSHOT_PATH` (default `openapi.json`)
/// and returns the path written.
pub fn write_openapi_snapshot() -> std::io::Result<String> {
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &ApiDoc::openapi())?;
    Ok(output_path)
}
