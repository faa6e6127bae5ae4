// tests/support/mocks/checkers.rs
use async_trait::async_trait;
use compliance_core::domain::health::{CheckOutcome, HealthChecker, HealthStatus};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always answers with the same status.
pub struct StaticChecker {
    name: String,
    status: HealthStatus,
}

impl StaticChecker {
    pub fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

#[async_trait]
impl HealthChecker for StaticChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        Ok(CheckOutcome::new(
            self.status,
            format!("{} is {}", self.name, self.status),
        ))
    }
}

/// Healthy, and remembers how often it ran.
pub struct CountingChecker {
    name: String,
    calls: AtomicUsize,
}

impl CountingChecker {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthChecker for CountingChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CheckOutcome::healthy("ok"))
    }
}

/// Fails the probe itself instead of reporting a status.
pub struct FailingChecker {
    name: String,
    message: String,
}

impl FailingChecker {
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl HealthChecker for FailingChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        Err(anyhow::anyhow!(self.message.clone()))
    }
}

/// Reports its own latency instead of letting the service measure it.
pub struct TimedChecker {
    name: String,
    latency_ms: u64,
}

impl TimedChecker {
    pub fn new(name: &str, latency_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            latency_ms,
        }
    }
}

#[async_trait]
impl HealthChecker for TimedChecker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        Ok(CheckOutcome::healthy("timed").with_latency_ms(self.latency_ms))
    }
}
