// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use crate::telemetry::{Logger, MetricsRegistry};
use std::sync::Arc;

/// Identity reported by `GET /` and stamped on boundary logs.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub metrics: Arc<MetricsRegistry>,
    pub service: Arc<ServiceInfo>,
    pub allowed_origins: Arc<[String]>,
    pub logger: Logger,
}
