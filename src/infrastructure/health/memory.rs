// src/infrastructure/health/memory.rs
use crate::domain::health::{CheckOutcome, HealthChecker};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use sysinfo::System;

pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Share of the warning band relative to the threshold.
const DEGRADED_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    pub used: u64,
    pub total: u64,
}

impl MemorySample {
    // Byte counts stay well below 2^52, where f64 starts dropping integers.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn used_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64
        }
    }
}

pub trait MemoryProbe: Send + Sync {
    fn sample(&self) -> anyhow::Result<MemorySample>;
}

/// Used versus total system memory via `sysinfo`.
pub struct SystemMemoryProbe {
    system: Mutex<System>,
}

impl SystemMemoryProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn sample(&self) -> anyhow::Result<MemorySample> {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();
        let total = system.total_memory();
        if total == 0 {
            anyhow::bail!("total memory is unavailable on this platform");
        }
        Ok(MemorySample {
            used: system.used_memory(),
            total,
        })
    }
}

/// `unhealthy` at or above `threshold`, `degraded` at or above 80% of it.
pub struct MemoryHealthChecker {
    threshold: f64,
    probe: Arc<dyn MemoryProbe>,
}

impl MemoryHealthChecker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self::with_probe(threshold, Arc::new(SystemMemoryProbe::new()))
    }

    #[must_use]
    pub fn with_probe(threshold: f64, probe: Arc<dyn MemoryProbe>) -> Self {
        Self { threshold, probe }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn evaluate(&self, fraction: f64) -> CheckOutcome {
        let percent = fraction * 100.0;
        if fraction >= self.threshold {
            CheckOutcome::unhealthy(format!("Memory usage critical: {percent:.2}%"))
        } else if fraction >= self.threshold * DEGRADED_RATIO {
            CheckOutcome::degraded(format!("Memory usage high: {percent:.2}%"))
        } else {
            CheckOutcome::healthy(format!("Memory usage normal: {percent:.2}%"))
        }
    }
}

impl Default for MemoryHealthChecker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[async_trait]
impl HealthChecker for MemoryHealthChecker {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check(&self) -> anyhow::Result<CheckOutcome> {
        let sample = self.probe.sample()?;
        Ok(self.evaluate(sample.used_fraction()))
    }
}
