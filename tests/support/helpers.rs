// tests/support/helpers.rs
use super::mocks::AdjustableClock;
use axum::Router;
use axum::body::{self, Body};
use axum::http::StatusCode;
use axum::response::Response;
use compliance_core::application::ports::time::Clock;
use compliance_core::application::services::{
    ApplicationServices, AuditLogger, HealthCheckService,
};
use compliance_core::domain::health::HealthChecker;
use compliance_core::infrastructure::audit::InMemoryAuditStore;
use compliance_core::presentation::http::controllers::audit::register_metrics;
use compliance_core::presentation::http::routes::{apply_layers, routes};
use compliance_core::presentation::http::state::{HttpState, ServiceInfo};
use compliance_core::telemetry::{LogContext, Logger, MetricsRegistry};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_VERSION: &str = "1.2.3";

pub fn test_logger() -> Logger {
    Logger::new(LogContext::service("compliance-test", "test"))
}

pub fn audit_logger(clock: Arc<AdjustableClock>, capacity: usize) -> AuditLogger {
    let clock: Arc<dyn Clock> = clock;
    AuditLogger::new(
        Arc::new(InMemoryAuditStore::new(capacity)),
        clock,
        90,
        &test_logger(),
    )
}

/// Everything a router test needs to reach behind the HTTP surface.
pub struct TestApp {
    pub state: HttpState,
    pub audit: Arc<AuditLogger>,
    pub health: Arc<HealthCheckService>,
    pub metrics: Arc<MetricsRegistry>,
    pub clock: Arc<AdjustableClock>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        apply_layers(routes(), self.state.clone())
    }

    /// The production routes plus `extra`, under the same layers.
    pub fn router_with(&self, extra: Router) -> Router {
        apply_layers(routes().merge(extra), self.state.clone())
    }
}

pub fn build_test_app(checkers: Vec<Arc<dyn HealthChecker>>) -> TestApp {
    let clock = Arc::new(AdjustableClock::fixed());
    let logger = test_logger();
    let audit = Arc::new(audit_logger(Arc::clone(&clock), 1_000));

    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let health = Arc::new(HealthCheckService::new(dyn_clock, TEST_VERSION, &logger));
    for checker in checkers {
        health.register_checker(checker);
    }

    let metrics = Arc::new(MetricsRegistry::new().expect("metrics registry"));
    register_metrics(&metrics).expect("audit counters");

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&audit),
        Arc::clone(&health),
    ));
    let state = HttpState {
        services,
        metrics: Arc::clone(&metrics),
        service: Arc::new(ServiceInfo {
            name: "compliance-test".into(),
            version: TEST_VERSION.into(),
            environment: "test".into(),
        }),
        allowed_origins: vec!["*".to_string()].into(),
        logger,
    };

    TestApp {
        state,
        audit,
        health,
        metrics,
        clock,
    }
}

pub fn make_test_router() -> Router {
    build_test_app(Vec::new()).router()
}

pub async fn read_body(resp: Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn read_json(resp: Response) -> Value {
    let text = read_body(resp).await;
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("invalid json ({err}): {text}"))
}

pub fn header_str<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Assert a JSON error body with the expected status and `error` field.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) -> Value {
    assert_eq!(resp.status(), expected_status);
    let ct = header_str(&resp, "content-type").to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json = read_json(resp).await;
    assert_eq!(json["error"], expected_error, "unexpected body: {json}");
    assert!(
        json["message"].as_str().is_some_and(|m| !m.is_empty()),
        "expected non-empty message: {json}"
    );
    json
}

pub fn get(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
