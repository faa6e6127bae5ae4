// src/domain/health/checker.rs
use crate::domain::health::status::HealthStatus;
use async_trait::async_trait;

/// What a checker reports about its dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: HealthStatus,
    pub message: Option<String>,
    /// Self-reported latency in milliseconds. When absent the aggregator
    /// measures the call itself.
    pub latency_ms: Option<u64>,
}

impl CheckOutcome {
    #[must_use]
    pub fn new(status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            latency_ms: None,
        }
    }

    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Healthy, message)
    }

    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Degraded, message)
    }

    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Unhealthy, message)
    }

    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}

/// Probe for a single dependency or resource. An `Err` is reported by the
/// aggregator as `unhealthy` with the error's message.
#[async_trait]
pub trait HealthChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> anyhow::Result<CheckOutcome>;
}
