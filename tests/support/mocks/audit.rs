// tests/support/mocks/audit.rs
use compliance_core::domain::audit::{AuditEvent, AuditSink};
use compliance_core::domain::errors::{DomainError, DomainResult};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AuditEvent>>,
    flushes: AtomicUsize,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl AuditSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn write(&self, event: &AuditEvent) -> DomainResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn flush(&self) -> DomainResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Rejects every write and flush.
pub struct FailingSink;

impl AuditSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn write(&self, _event: &AuditEvent) -> DomainResult<()> {
        Err(DomainError::Persistence("sink offline".into()))
    }

    fn flush(&self) -> DomainResult<()> {
        Err(DomainError::Persistence("sink offline".into()))
    }
}
