// src/infrastructure/health/connectivity.rs
use crate::domain::health::{CheckOutcome, HealthChecker};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Answers "can we reach the dependency right now?".
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn probe(&self) -> anyhow::Result<bool>;
}

#[async_trait]
impl<F, Fut> ConnectionProbe for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<bool>> + Send,
{
    async fn probe(&self) -> anyhow::Result<bool> {
        (self)().await
    }
}

/// Health of a remote dependency (database, cache, sink) behind an injected
/// probe. Probe errors become `unhealthy` with the error text.
pub struct ConnectivityHealthChecker {
    name: String,
    probe: Arc<dyn ConnectionProbe>,
}

impl ConnectivityHealthChecker {
    #[must_use]
    pub fn new(name: impl Into<String>, probe: impl ConnectionProbe + 'static) -> Self {
        Self {
            name: name.into(),
            probe: Arc::new(probe),
        }
    }
}

#[async_trait]
impl HealthChecker for ConnectivityHealthChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        let outcome = match self.probe.probe().await {
            Ok(true) => CheckOutcome::healthy(format!("{} connected", self.name)),
            Ok(false) => CheckOutcome::unhealthy(format!("{} connection failed", self.name)),
            Err(err) => CheckOutcome::unhealthy(err.to_string()),
        };
        Ok(outcome)
    }
}
