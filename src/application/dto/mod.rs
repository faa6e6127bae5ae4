pub mod audit;
pub mod health;

pub use audit::{CleanupResultDto, RetentionPolicyDto};
pub use health::{CheckResult, HealthCheckResult, LivenessReport};
