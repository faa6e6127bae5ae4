// src/infrastructure/audit/mod.rs
mod file_sink;
mod memory_store;

pub use file_sink::JsonLinesFileSink;
pub use memory_store::InMemoryAuditStore;
