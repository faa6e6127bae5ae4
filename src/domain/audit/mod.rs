// src/domain/audit/mod.rs
pub mod entity;
pub mod filter;
pub mod repository;
pub mod retention;

pub use entity::{
    AuditActor, AuditChanges, AuditEvent, AuditEventId, AuditEventType, AuditResource,
    AuditResult, AuditSeverity, NewAuditEvent,
};
pub use filter::AuditFilter;
pub use repository::{AuditEventStore, AuditSink};
pub use retention::RetentionPolicy;
