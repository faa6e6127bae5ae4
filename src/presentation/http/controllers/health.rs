// src/presentation/http/controllers/health.rs
use crate::application::dto::{HealthCheckResult, LivenessReport};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};

fn status_code(report: &HealthCheckResult) -> StatusCode {
    if report.status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Every checker is healthy.", body = HealthCheckResult),
        (status = 503, description = "At least one checker is degraded or unhealthy.", body = HealthCheckResult)
    ),
    tag = "Health"
)]
pub async fn health(Extension(state): Extension<HttpState>) -> (StatusCode, Json<HealthCheckResult>) {
    let report = state.services.health().perform_health_check().await;
    (status_code(&report), Json(report))
}

#[utoipa::path(
    get,
    path = "/health/liveness",
    responses(
        (status = 200, description = "The process is running.", body = LivenessReport)
    ),
    tag = "Health"
)]
pub async fn liveness(Extension(state): Extension<HttpState>) -> Json<LivenessReport> {
    Json(state.services.health().perform_liveness_check().await)
}

#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Ready to receive traffic.", body = HealthCheckResult),
        (status = 503, description = "Not ready.", body = HealthCheckResult)
    ),
    tag = "Health"
)]
pub async fn readiness(
    Extension(state): Extension<HttpState>,
) -> (StatusCode, Json<HealthCheckResult>) {
    let report = state.services.health().perform_readiness_check().await;
    (status_code(&report), Json(report))
}
