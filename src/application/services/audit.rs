// src/application/services/audit.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::time::Clock;
use crate::application::queries::audit::{render_csv, render_json};
use crate::domain::audit::{
    AuditActor, AuditChanges, AuditEvent, AuditEventId, AuditEventStore, AuditEventType,
    AuditFilter, AuditResource, AuditResult, AuditSeverity, AuditSink, NewAuditEvent,
    RetentionPolicy,
};
use crate::domain::serde_time;
use crate::telemetry::{LogContext, Logger};
use serde_json::{Value, json};
use std::sync::Arc;

/// Records compliance events into a bounded store, mirrors each one to the
/// structured log and to any configured sinks, and serves filtered views,
/// exports and retention cleanup.
pub struct AuditLogger {
    store: Arc<dyn AuditEventStore>,
    sinks: Vec<Arc<dyn AuditSink>>,
    clock: Arc<dyn Clock>,
    retention_days: u32,
    logger: Logger,
}

impl AuditLogger {
    #[must_use]
    pub fn new(
        store: Arc<dyn AuditEventStore>,
        clock: Arc<dyn Clock>,
        retention_days: u32,
        parent: &Logger,
    ) -> Self {
        Self {
            store,
            sinks: Vec::new(),
            clock,
            retention_days,
            logger: parent.child(LogContext::component("audit-logger")),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Stamps `event` with a fresh id and the current time, then appends it.
    /// When the store is full the oldest event is evicted first.
    pub fn log_event(&self, event: NewAuditEvent) -> AuditEvent {
        let event = AuditEvent::stamp(AuditEventId::generate(), self.clock.now(), event);

        self.logger.info(
            "Audit event logged",
            Some(json!({
                "auditEvent": &event,
                "eventType": event.event_type.as_str(),
                "actor": event.actor.label(),
                "resource": &event.resource.resource_type,
                "action": &event.action,
                "result": event.result.as_str(),
            })),
        );

        for sink in &self.sinks {
            if let Err(err) = sink.write(&event) {
                self.logger.warn(
                    "failed to ship audit event",
                    Some(json!({ "sink": sink.name(), "eventId": event.id, "error": err.to_string() })),
                );
            }
        }

        if let Some(evicted) = self.store.append(event.clone()) {
            self.logger.debug(
                "audit buffer at capacity, evicted oldest event",
                Some(json!({ "evictedId": evicted.id, "capacity": self.store.capacity() })),
            );
        }

        event
    }

    pub fn log_user_action(
        &self,
        user_id: &str,
        action: &str,
        resource_type: &str,
        resource_id: Option<&str>,
        result: AuditResult,
        metadata: Option<Value>,
    ) -> AuditEvent {
        self.log_event(
            NewAuditEvent::new(
                AuditEventType::DataAccess,
                AuditSeverity::Info,
                AuditResource::new(resource_type).with_id(resource_id.map(str::to_owned)),
                action,
                result,
            )
            .with_actor(AuditActor::user(user_id))
            .with_metadata(metadata),
        )
    }

    /// Failed security events are recorded at `warning`, everything else at
    /// `info`.
    pub fn log_security_event(
        &self,
        event_type: AuditEventType,
        user_id: Option<&str>,
        ip_address: &str,
        action: &str,
        result: AuditResult,
        metadata: Option<Value>,
    ) -> AuditEvent {
        let severity = match result {
            AuditResult::Failure => AuditSeverity::Warning,
            AuditResult::Success => AuditSeverity::Info,
        };
        let actor = AuditActor {
            user_id: user_id.map(str::to_owned),
            ip_address: Some(ip_address.to_owned()),
            ..AuditActor::default()
        };
        self.log_event(
            NewAuditEvent::new(
                event_type,
                severity,
                AuditResource::new("security"),
                action,
                result,
            )
            .with_actor(actor)
            .with_metadata(metadata),
        )
    }

    pub fn log_data_change(
        &self,
        user_id: &str,
        resource_type: &str,
        resource_id: &str,
        action: &str,
        before: Value,
        after: Value,
    ) -> AuditEvent {
        self.log_event(
            NewAuditEvent::new(
                AuditEventType::DataUpdated,
                AuditSeverity::Info,
                AuditResource::new(resource_type).with_id(Some(resource_id.to_owned())),
                action,
                AuditResult::Success,
            )
            .with_actor(AuditActor::user(user_id))
            .with_changes(AuditChanges {
                before: Some(before),
                after: Some(after),
            }),
        )
    }

    /// Matching events, oldest first. Does not modify the store.
    pub fn filter_events(&self, filter: &AuditFilter) -> Vec<AuditEvent> {
        self.store.scan(filter)
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.store.scan(&AuditFilter::default())
    }

    pub fn export_events(&self, filter: Option<&AuditFilter>) -> ApplicationResult<String> {
        render_json(&self.select(filter))
    }

    /// CSV export; `"No events to export"` when nothing matches.
    pub fn export_events_csv(&self, filter: Option<&AuditFilter>) -> String {
        render_csv(&self.select(filter))
    }

    /// The cutoff moves with the wall clock, so two calls can disagree.
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::at(self.retention_days, self.clock.now())
    }

    /// Drops every event older than the retention cutoff and returns the
    /// number removed.
    pub fn cleanup_old_events(&self) -> usize {
        let policy = self.retention_policy();
        let removed = self.store.remove_expired(&policy);

        if removed > 0 {
            self.logger.info(
                &format!("Cleaned up {removed} old audit events"),
                Some(json!({
                    "retentionDays": policy.retention_days,
                    "cutoffDate": serde_time::format(&policy.cutoff_date),
                })),
            );
        }

        removed
    }

    pub fn event_count(&self) -> usize {
        self.store.len()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Irreversibly empties the in-memory buffer. Sinks keep what they
    /// already received.
    pub fn clear_all_events(&self) {
        self.store.clear();
        self.logger.warn("All audit events cleared from memory", None);
    }

    /// Flushes every sink. Call once in-flight requests have drained.
    pub fn shutdown(&self) -> ApplicationResult<()> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(err) = sink.flush() {
                failures.push(format!("{}: {err}", sink.name()));
            }
        }

        if failures.is_empty() {
            self.logger.info(
                "audit sinks flushed",
                Some(json!({ "sinks": self.sinks.len(), "buffered": self.store.len() })),
            );
            Ok(())
        } else {
            Err(ApplicationError::SinkFlush(failures))
        }
    }

    fn select(&self, filter: Option<&AuditFilter>) -> Vec<AuditEvent> {
        match filter {
            Some(filter) => self.filter_events(filter),
            None => self.events(),
        }
    }
}
