// src/infrastructure/health/mod.rs
mod connectivity;
mod memory;

pub use connectivity::{ConnectionProbe, ConnectivityHealthChecker};
pub use memory::{MemoryHealthChecker, MemoryProbe, MemorySample, SystemMemoryProbe};
