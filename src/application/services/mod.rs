// src/application/services/mod.rs
pub mod audit;
pub mod health;

use std::sync::Arc;

pub use audit::AuditLogger;
pub use health::HealthCheckService;

pub struct ApplicationServices {
    audit_logger: Arc<AuditLogger>,
    health: Arc<HealthCheckService>,
}

impl ApplicationServices {
    #[must_use]
    pub fn new(audit_logger: Arc<AuditLogger>, health: Arc<HealthCheckService>) -> Self {
        Self {
            audit_logger,
            health,
        }
    }

    pub fn audit_logger(&self) -> Arc<AuditLogger> {
        Arc::clone(&self.audit_logger)
    }

    pub fn health(&self) -> Arc<HealthCheckService> {
        Arc::clone(&self.health)
    }
}
