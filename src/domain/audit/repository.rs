// src/domain/audit/repository.rs
use crate::domain::audit::entity::AuditEvent;
use crate::domain::audit::filter::AuditFilter;
use crate::domain::audit::retention::RetentionPolicy;
use crate::domain::errors::DomainResult;

/// Bounded, append-only buffer of audit events in insertion order.
///
/// Implementations serialize `append` against every other operation so that
/// concurrent writers never lose or reorder events.
pub trait AuditEventStore: Send + Sync {
    /// Appends `event`, evicting and returning the oldest entry when the
    /// store is already at capacity.
    fn append(&self, event: AuditEvent) -> Option<AuditEvent>;

    /// Matching events, oldest first.
    fn scan(&self, filter: &AuditFilter) -> Vec<AuditEvent>;

    /// Removes every event `policy` considers expired and returns how many
    /// were dropped.
    fn remove_expired(&self, policy: &RetentionPolicy) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);

    fn capacity(&self) -> usize;
}

/// Write-only destination that ships events out of process.
pub trait AuditSink: Send + Sync {
    fn name(&self) -> &str;

    fn write(&self, event: &AuditEvent) -> DomainResult<()>;

    fn flush(&self) -> DomainResult<()>;
}
