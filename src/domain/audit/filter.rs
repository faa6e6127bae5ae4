// src/domain/audit/filter.rs
use crate::domain::audit::entity::{AuditEvent, AuditEventType, AuditSeverity};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Conjunctive filter over audit events. Unset fields match everything and
/// both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<AuditEventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<AuditSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if self.event_type.is_some_and(|kind| kind != event.event_type) {
            return false;
        }
        if self
            .user_id
            .as_deref()
            .is_some_and(|user_id| event.actor.user_id.as_deref() != Some(user_id))
        {
            return false;
        }
        if self
            .resource_type
            .as_deref()
            .is_some_and(|resource_type| event.resource.resource_type != resource_type)
        {
            return false;
        }
        if self.severity.is_some_and(|severity| severity != event.severity) {
            return false;
        }
        if self.start_date.is_some_and(|start| event.timestamp < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| event.timestamp > end) {
            return false;
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
