// src/presentation/http/middleware/mod.rs
pub mod audit;
pub mod correlation;
pub mod metrics;

pub use audit::error_audit_middleware;
pub use correlation::correlation_middleware;
pub use metrics::metrics_middleware;
