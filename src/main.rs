// src/main.rs
use anyhow::Result;
use compliance_core::application::ports::time::Clock;
use compliance_core::application::services::{
    ApplicationServices, AuditLogger, HealthCheckService,
};
use compliance_core::config::AppConfig;
use compliance_core::domain::audit::{
    AuditActor, AuditEventType, AuditResource, AuditResult, AuditSeverity, AuditSink,
    NewAuditEvent,
};
use compliance_core::infrastructure::{
    audit::{InMemoryAuditStore, JsonLinesFileSink},
    health::{ConnectivityHealthChecker, MemoryHealthChecker},
    time::SystemClock,
};
use compliance_core::presentation::http::{
    controllers::audit::register_metrics,
    routes::build_router,
    state::{HttpState, ServiceInfo},
};
use compliance_core::telemetry::{LogContext, Logger, MetricsRegistry, init_tracing};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_filter(), config.log_format());

    let logger = Logger::new(LogContext::service(
        config.service_name(),
        config.environment(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = Arc::new(InMemoryAuditStore::new(config.audit_max_events()));
    let mut audit = AuditLogger::new(
        store,
        Arc::clone(&clock),
        config.audit_retention_days(),
        &logger,
    );
    if let Some(path) = config.audit_log_file() {
        let sink: Arc<dyn AuditSink> = Arc::new(JsonLinesFileSink::open(path)?);
        audit = audit.with_sink(sink);
    }
    let audit = Arc::new(audit);

    let health = Arc::new(HealthCheckService::new(
        Arc::clone(&clock),
        config.app_version(),
        &logger,
    ));
    health.register_checker(Arc::new(MemoryHealthChecker::new(config.memory_threshold())));
    if let Some(path) = config.audit_log_file() {
        let path = path.clone();
        health.register_checker(Arc::new(ConnectivityHealthChecker::new(
            "audit-log-file",
            move || {
                let path = path.clone();
                async move { Ok(tokio::fs::metadata(&path).await.is_ok()) }
            },
        )));
    }

    let metrics = Arc::new(MetricsRegistry::new()?);
    register_metrics(&metrics)?;

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&audit),
        Arc::clone(&health),
    ));

    let state = HttpState {
        services,
        metrics,
        service: Arc::new(ServiceInfo {
            name: config.service_name().to_string(),
            version: config.app_version().to_string(),
            environment: config.environment().to_string(),
        }),
        allowed_origins: config.allowed_origins().into(),
        logger: logger.clone(),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    logger.info(
        "Server started successfully",
        Some(json!({
            "address": address.to_string(),
            "environment": config.environment(),
            "version": config.app_version(),
        })),
    );

    audit.log_event(
        NewAuditEvent::new(
            AuditEventType::SystemEvent,
            AuditSeverity::Info,
            AuditResource::new("system"),
            "startup",
            AuditResult::Success,
        )
        .with_actor(AuditActor::default())
        .with_metadata(Some(json!({ "address": address.to_string() }))),
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(logger.clone()))
    .await?;

    audit.shutdown()?;
    logger.info("Server closed", None);

    Ok(())
}

async fn shutdown_signal(logger: Logger) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            logger.error("failed to listen for CTRL+C", &err, None);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                logger.error("failed to install SIGTERM handler", &err, None);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    logger.info("Shutdown signal received, draining connections", None);
}
