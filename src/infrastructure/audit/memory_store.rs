// src/infrastructure/audit/memory_store.rs
use crate::domain::audit::{AuditEvent, AuditEventStore, AuditFilter, RetentionPolicy};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Fixed-capacity ring of audit events. Appending to a full ring drops the
/// oldest entry in O(1).
pub struct InMemoryAuditStore {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl InMemoryAuditStore {
    /// A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<AuditEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuditEventStore for InMemoryAuditStore {
    fn append(&self, event: AuditEvent) -> Option<AuditEvent> {
        let mut events = self.guard();
        let evicted = if events.len() >= self.capacity {
            events.pop_front()
        } else {
            None
        };
        events.push_back(event);
        evicted
    }

    fn scan(&self, filter: &AuditFilter) -> Vec<AuditEvent> {
        self.guard()
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect()
    }

    fn remove_expired(&self, policy: &RetentionPolicy) -> usize {
        let mut events = self.guard();
        let before = events.len();
        events.retain(|event| !policy.is_expired(event.timestamp));
        before - events.len()
    }

    fn len(&self) -> usize {
        self.guard().len()
    }

    fn clear(&self) {
        self.guard().clear();
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
