// src/application/services/health.rs
use crate::application::dto::{CheckResult, HealthCheckResult, LivenessReport};
use crate::application::ports::time::Clock;
use crate::domain::health::{HealthChecker, HealthStatus};
use crate::telemetry::{LogContext, Logger};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::time::Instant;

/// Runs every registered checker and folds their statuses into one report.
///
/// Checkers run sequentially in registration order. A checker that returns an
/// error is recorded as `unhealthy` and the remaining checkers still run.
/// No timeout is applied here; probes that do I/O must bound themselves.
pub struct HealthCheckService {
    checkers: RwLock<Vec<Arc<dyn HealthChecker>>>,
    started_at: Instant,
    clock: Arc<dyn Clock>,
    version: String,
    logger: Logger,
}

impl HealthCheckService {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, version: impl Into<String>, parent: &Logger) -> Self {
        Self {
            checkers: RwLock::new(Vec::new()),
            started_at: Instant::now(),
            clock,
            version: version.into(),
            logger: parent.child(LogContext::component("health-check")),
        }
    }

    /// Names are not deduplicated: registering the same name twice runs both.
    pub fn register_checker(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        self.checkers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(checker);
        self.logger.info(
            &format!("Health checker registered: {name}"),
            Some(json!({ "checker": name })),
        );
    }

    pub fn checker_count(&self) -> usize {
        self.checkers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn perform_health_check(&self) -> HealthCheckResult {
        let checkers = self
            .checkers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut checks = BTreeMap::new();
        let mut statuses = Vec::with_capacity(checkers.len());

        for checker in checkers {
            let name = checker.name().to_string();
            let started = Instant::now();

            let result = match checker.check().await {
                Ok(outcome) => {
                    let measured = millis(started.elapsed());
                    CheckResult {
                        status: outcome.status,
                        message: outcome.message,
                        latency: Some(outcome.latency_ms.unwrap_or(measured)),
                        timestamp: self.clock.now(),
                    }
                }
                Err(err) => {
                    self.logger.error(
                        &format!("Health check failed for {name}"),
                        err.as_ref(),
                        Some(json!({ "checker": &name })),
                    );
                    CheckResult {
                        status: HealthStatus::Unhealthy,
                        message: Some(err.to_string()),
                        latency: None,
                        timestamp: self.clock.now(),
                    }
                }
            };

            statuses.push(result.status);
            checks.insert(name, result);
        }

        HealthCheckResult {
            status: HealthStatus::aggregate(statuses),
            checks,
            uptime: self.started_at.elapsed().as_secs(),
            timestamp: self.clock.now(),
            version: self.version.clone(),
        }
    }

    /// Same criteria as [`perform_health_check`](Self::perform_health_check);
    /// readiness does not yet exclude any checker.
    pub async fn perform_readiness_check(&self) -> HealthCheckResult {
        self.perform_health_check().await
    }

    /// Reports that the process is scheduling work. Never runs checkers.
    pub async fn perform_liveness_check(&self) -> LivenessReport {
        LivenessReport {
            status: HealthStatus::Healthy,
            timestamp: self.clock.now(),
        }
    }
}

fn millis(elapsed: std::time::Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
