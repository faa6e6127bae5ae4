// src/domain/audit/entity.rs
use crate::domain::errors::DomainError;
use crate::domain::serde_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditEventId(Uuid);

impl AuditEventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AuditEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventType {
    #[serde(rename = "user.login")]
    UserLogin,
    #[serde(rename = "user.logout")]
    UserLogout,
    #[serde(rename = "user.created")]
    UserCreated,
    #[serde(rename = "user.updated")]
    UserUpdated,
    #[serde(rename = "user.deleted")]
    UserDeleted,
    #[serde(rename = "data.access")]
    DataAccess,
    #[serde(rename = "data.created")]
    DataCreated,
    #[serde(rename = "data.updated")]
    DataUpdated,
    #[serde(rename = "data.deleted")]
    DataDeleted,
    #[serde(rename = "data.exported")]
    DataExported,
    #[serde(rename = "permission.granted")]
    PermissionGranted,
    #[serde(rename = "permission.revoked")]
    PermissionRevoked,
    #[serde(rename = "config.changed")]
    ConfigChanged,
    #[serde(rename = "security.event")]
    SecurityEvent,
    #[serde(rename = "system.event")]
    SystemEvent,
}

impl AuditEventType {
    pub const ALL: [AuditEventType; 15] = [
        Self::UserLogin,
        Self::UserLogout,
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
        Self::DataAccess,
        Self::DataCreated,
        Self::DataUpdated,
        Self::DataDeleted,
        Self::DataExported,
        Self::PermissionGranted,
        Self::PermissionRevoked,
        Self::ConfigChanged,
        Self::SecurityEvent,
        Self::SystemEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserLogin => "user.login",
            Self::UserLogout => "user.logout",
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::DataAccess => "data.access",
            Self::DataCreated => "data.created",
            Self::DataUpdated => "data.updated",
            Self::DataDeleted => "data.deleted",
            Self::DataExported => "data.exported",
            Self::PermissionGranted => "permission.granted",
            Self::PermissionRevoked => "permission.revoked",
            Self::ConfigChanged => "config.changed",
            Self::SecurityEvent => "security.event",
            Self::SystemEvent => "system.event",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown audit event type '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Info,
    Warning,
    Critical,
}

impl AuditSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditSeverity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(DomainError::Validation(format!(
                "unknown audit severity '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    Success,
    Failure,
}

impl AuditResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who performed the action. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditActor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AuditActor {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// The most specific label available for log lines.
    pub fn label(&self) -> Option<&str> {
        self.user_id.as_deref().or(self.username.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuditResource {
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// Everything a caller supplies when recording an event. Identity and
/// timestamp are assigned by the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEvent {
    pub event_type: AuditEventType,
    pub severity: AuditSeverity,
    pub actor: AuditActor,
    pub resource: AuditResource,
    pub action: String,
    pub result: AuditResult,
    pub metadata: Option<Value>,
    pub changes: Option<AuditChanges>,
    pub correlation_id: Option<String>,
}

impl NewAuditEvent {
    #[must_use]
    pub fn new(
        event_type: AuditEventType,
        severity: AuditSeverity,
        resource: AuditResource,
        action: impl Into<String>,
        result: AuditResult,
    ) -> Self {
        Self {
            event_type,
            severity,
            actor: AuditActor::default(),
            resource,
            action: action.into(),
            result,
            metadata: None,
            changes: None,
            correlation_id: None,
        }
    }

    #[must_use]
    pub fn with_actor(mut self, actor: AuditActor) -> Self {
        self.actor = actor;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_changes(mut self, changes: AuditChanges) -> Self {
        self.changes = Some(changes);
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: AuditEventId,
    #[serde(with = "serde_time")]
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    pub severity: AuditSeverity,
    pub actor: AuditActor,
    pub resource: AuditResource,
    pub action: String,
    pub result: AuditResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<AuditChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl AuditEvent {
    #[must_use]
    pub fn stamp(id: AuditEventId, timestamp: DateTime<Utc>, event: NewAuditEvent) -> Self {
        Self {
            id,
            timestamp,
            event_type: event.event_type,
            severity: event.severity,
            actor: event.actor,
            resource: event.resource,
            action: event.action,
            result: event.result,
            metadata: event.metadata,
            changes: event.changes,
            correlation_id: event.correlation_id,
        }
    }
}
