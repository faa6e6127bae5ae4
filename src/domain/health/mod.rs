// src/domain/health/mod.rs
pub mod checker;
pub mod status;

pub use checker::{CheckOutcome, HealthChecker};
pub use status::HealthStatus;
