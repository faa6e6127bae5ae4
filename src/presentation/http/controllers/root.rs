// src/presentation/http/controllers/root.rs
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMap {
    pub health: String,
    pub liveness: String,
    pub readiness: String,
    pub metrics: String,
    pub audit_export: String,
    pub audit_retention: String,
    pub audit_cleanup: String,
    pub openapi: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDescriptor {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub status: String,
    pub endpoints: EndpointMap,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service identity and endpoint map.", body = ServiceDescriptor)
    ),
    tag = "System"
)]
pub async fn service_descriptor(Extension(state): Extension<HttpState>) -> Json<ServiceDescriptor> {
    let info = &state.service;
    Json(ServiceDescriptor {
        service: info.name.clone(),
        version: info.version.clone(),
        environment: info.environment.clone(),
        status: "running".into(),
        endpoints: EndpointMap {
            health: "/health".into(),
            liveness: "/health/liveness".into(),
            readiness: "/health/readiness".into(),
            metrics: "/metrics".into(),
            audit_export: "/audit/export".into(),
            audit_retention: "/audit/retention".into(),
            audit_cleanup: "/audit/cleanup".into(),
            openapi: "/api-docs/openapi.json".into(),
        },
    })
}
