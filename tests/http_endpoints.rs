// tests/http_endpoints.rs
use axum::Router;
use axum::http::{Request, StatusCode};
use axum::body::Body;
use axum::routing::get;
use chrono::Duration;
use compliance_core::domain::audit::{AuditEventType, AuditFilter, AuditSeverity};
use compliance_core::domain::health::HealthStatus;
use compliance_core::presentation::http::error::HttpError;
use std::sync::Arc;
use tower::util::ServiceExt as _;

mod support;
use support::{
    StaticChecker, assert_error_response, build_test_app, get as get_req, header_str,
    make_test_router, post as post_req, read_body, read_json,
};

fn events_of(app: &support::TestApp, kind: AuditEventType) -> Vec<compliance_core::domain::audit::AuditEvent> {
    app.audit.filter_events(&AuditFilter {
        event_type: Some(kind),
        ..AuditFilter::default()
    })
}

#[tokio::test]
async fn root_describes_the_service() {
    let resp = make_test_router().oneshot(get_req("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["service"], "compliance-test");
    assert_eq!(json["status"], "running");
    assert_eq!(json["endpoints"]["auditExport"], "/audit/export");
}

/// 全チェッカーが healthy なら 200
#[tokio::test]
async fn health_is_200_when_everything_is_healthy() {
    let app = build_test_app(vec![Arc::new(StaticChecker::new("db", HealthStatus::Healthy))]);
    let resp = app.router().oneshot(get_req("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["db"]["status"], "healthy");
    assert_eq!(json["version"], support::TEST_VERSION);
}

/// degraded でも 503 を返し、本文は同じ形
#[tokio::test]
async fn health_and_readiness_are_503_when_degraded() {
    let app = build_test_app(vec![
        Arc::new(StaticChecker::new("db", HealthStatus::Healthy)),
        Arc::new(StaticChecker::new("cache", HealthStatus::Degraded)),
    ]);

    for uri in ["/health", "/health/readiness"] {
        let resp = app.router().oneshot(get_req(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        let json = read_json(resp).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"]["cache"]["status"], "degraded");
    }
}

#[tokio::test]
async fn liveness_is_200_even_when_unhealthy() {
    let app = build_test_app(vec![Arc::new(StaticChecker::new("db", HealthStatus::Unhealthy))]);
    let resp = app.router().oneshot(get_req("/health/liveness")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("checks").is_none());
}

#[tokio::test]
async fn metrics_are_exposed_as_text() {
    let app = build_test_app(Vec::new());
    let router = app.router();

    let warmup = router.clone().oneshot(get_req("/health")).await.unwrap();
    assert_eq!(warmup.status(), StatusCode::OK);

    let resp = router.oneshot(get_req("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header_str(&resp, "content-type").starts_with("text/plain"));
    let body = read_body(resp).await;
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("route=\"/health\""));
}

#[tokio::test]
async fn export_defaults_to_json_and_is_audited() {
    let app = build_test_app(Vec::new());
    app.audit.log_event(support::login_event("alice"));

    let req = Request::builder()
        .uri("/audit/export")
        .header("x-user-id", "auditor")
        .header("x-forwarded-for", "203.0.113.5, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, "content-type"), "application/json");
    assert_eq!(
        header_str(&resp, "content-disposition"),
        "attachment; filename=audit-log.json"
    );
    let json = read_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let exported = events_of(&app, AuditEventType::DataExported);
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].actor.user_id.as_deref(), Some("auditor"));
    assert_eq!(exported[0].actor.ip_address.as_deref(), Some("203.0.113.5"));
    assert_eq!(exported[0].resource.resource_type, "audit-log");
    assert_eq!(exported[0].metadata.as_ref().unwrap()["format"], "json");
}

#[tokio::test]
async fn export_csv_applies_filters_and_ignores_garbage() {
    let app = build_test_app(Vec::new());
    app.audit.log_event(support::login_event("alice"));
    app.audit.log_event(support::login_event("bob"));

    let resp = app
        .router()
        .oneshot(get_req(
            "/audit/export?format=csv&userId=alice&eventType=bogus&startDate=not-a-date",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, "content-type"), "text/csv");
    assert_eq!(
        header_str(&resp, "content-disposition"),
        "attachment; filename=audit-log.csv"
    );
    let body = read_body(resp).await;
    let lines: Vec<&str> = body.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("alice"));
}

#[tokio::test]
async fn export_of_nothing_is_still_a_document() {
    let app = build_test_app(Vec::new());
    let csv = app
        .router()
        .oneshot(get_req("/audit/export?format=csv&userId=nobody"))
        .await
        .unwrap();
    assert_eq!(csv.status(), StatusCode::OK);
    assert_eq!(read_body(csv).await, "No events to export");

    let json = app
        .router()
        .oneshot(get_req("/audit/export?userId=nobody"))
        .await
        .unwrap();
    assert_eq!(read_body(json).await, "[]");
}

#[tokio::test]
async fn retention_reports_days_and_cutoff() {
    let resp = make_test_router().oneshot(get_req("/audit/retention")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["retentionDays"], 90);
    assert_eq!(json["cutoffDate"], "2024-01-11T08:30:00.000Z");
}

/// cleanup は件数を返し、自身も SYSTEM_EVENT として記録される
#[tokio::test]
async fn cleanup_removes_old_events_and_records_itself() {
    let app = build_test_app(Vec::new());
    app.clock.rewind(Duration::days(200));
    app.audit.log_event(support::system_event("ancient"));
    app.clock.set(support::fixed_now());
    app.audit.log_event(support::system_event("recent"));

    let resp = app.router().oneshot(post_req("/audit/cleanup")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["removedCount"], 1);
    assert_eq!(json["message"], "Cleaned up 1 old audit events");

    let cleanup_events: Vec<_> = events_of(&app, AuditEventType::SystemEvent)
        .into_iter()
        .filter(|e| e.action == "cleanup")
        .collect();
    assert_eq!(cleanup_events.len(), 1);
    assert_eq!(cleanup_events[0].metadata.as_ref().unwrap()["removedCount"], 1);

    let second = app.router().oneshot(post_req("/audit/cleanup")).await.unwrap();
    assert_eq!(read_json(second).await["removedCount"], 0);
}

#[tokio::test]
async fn correlation_id_is_echoed_or_generated() {
    let router = make_test_router();

    let req = Request::builder()
        .uri("/health/liveness")
        .header("x-correlation-id", "corr-123")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(header_str(&resp, "x-correlation-id"), "corr-123");

    let req = Request::builder()
        .uri("/health/liveness")
        .header("x-request-id", "req-9")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(header_str(&resp, "x-correlation-id"), "req-9");

    let resp = router.oneshot(get_req("/health/liveness")).await.unwrap();
    assert!(uuid::Uuid::parse_str(header_str(&resp, "x-correlation-id")).is_ok());
}

/// パニックは 500 と correlationId を返し、CRITICAL の監査イベントになる
#[tokio::test]
async fn panics_become_audited_500s() {
    let app = build_test_app(Vec::new());
    let router = app.router_with(Router::new().route(
        "/boom",
        get(|| async {
            if true {
                panic!("database password is hunter2");
            }
            "unreachable"
        }),
    ));

    let req = Request::builder()
        .uri("/boom")
        .header("x-correlation-id", "corr-boom")
        .header("x-user-id", "u-7")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();

    let json = assert_error_response(resp, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").await;
    assert_eq!(json["correlationId"], "corr-boom");
    assert!(!json.to_string().contains("hunter2"));

    let errors: Vec<_> = app
        .audit
        .filter_events(&AuditFilter {
            severity: Some(AuditSeverity::Critical),
            ..AuditFilter::default()
        });
    assert_eq!(errors.len(), 1);
    let event = &errors[0];
    assert_eq!(event.event_type, AuditEventType::SystemEvent);
    assert_eq!(event.resource.resource_type, "system");
    assert_eq!(event.action, "error");
    assert_eq!(event.correlation_id.as_deref(), Some("corr-boom"));
    assert_eq!(event.actor.user_id.as_deref(), Some("u-7"));
    let metadata = event.metadata.as_ref().unwrap();
    assert_eq!(metadata["url"], "/boom");
    assert_eq!(metadata["method"], "GET");
}

#[tokio::test]
async fn internal_handler_errors_are_audited_without_leaking_details() {
    let app = build_test_app(Vec::new());
    let router = app.router_with(Router::new().route(
        "/fail",
        get(|| async { Err::<&'static str, _>(HttpError::internal("disk quota exceeded")) }),
    ));

    let resp = router.oneshot(get_req("/fail")).await.unwrap();
    let json = assert_error_response(resp, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").await;
    assert!(json["correlationId"].is_string());
    assert!(!json.to_string().contains("disk quota"));

    let errors = events_of(&app, AuditEventType::SystemEvent);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, AuditSeverity::Critical);
    assert_eq!(errors[0].metadata.as_ref().unwrap()["error"], "disk quota exceeded");

    let text = app.metrics.render().unwrap();
    assert!(text.contains("error_type=\"server_error\""));
    assert_eq!(app.metrics.active_connections(), 0);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let resp = make_test_router()
        .oneshot(get_req("/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["info"]["version"], support::TEST_VERSION);
    assert!(json["paths"]["/audit/export"]["get"].is_object());
}

#[tokio::test]
async fn unknown_routes_are_404_counted_and_not_audited() {
    let app = build_test_app(Vec::new());
    let resp = app.router().oneshot(get_req("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(app.audit.events().is_empty());

    let text = app.metrics.render().unwrap();
    assert!(text.contains("route=\"unmatched\""));
    assert!(!text.contains("http_request_errors_total{"));
}

/// 処理中にキャンセルされたリクエストでも接続数ゲージが戻ること
#[tokio::test(start_paused = true)]
async fn cancelled_requests_release_the_connection_gauge() {
    let app = build_test_app(Vec::new());
    let router = app.router_with(Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            "done"
        }),
    ));

    let outcome = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        router.oneshot(get_req("/slow")),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(app.metrics.active_connections(), 0);

    let text = app.metrics.render().unwrap();
    assert!(text.lines().any(|line| line == "active_connections 0"));
}
