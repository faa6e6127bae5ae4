// src/telemetry/mod.rs
pub mod logger;
pub mod metrics;
pub mod subscriber;

pub use logger::{LogContext, Logger};
pub use metrics::{ActiveConnectionGuard, MetricsError, MetricsRegistry};
pub use subscriber::init_tracing;
