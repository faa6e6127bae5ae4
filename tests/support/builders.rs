// tests/support/builders.rs
use compliance_core::domain::audit::{
    AuditActor, AuditEventType, AuditResource, AuditResult, AuditSeverity, NewAuditEvent,
};

pub fn login_event(user_id: &str) -> NewAuditEvent {
    NewAuditEvent::new(
        AuditEventType::UserLogin,
        AuditSeverity::Info,
        AuditResource::new("session"),
        "login",
        AuditResult::Success,
    )
    .with_actor(AuditActor::user(user_id))
}

pub fn system_event(action: &str) -> NewAuditEvent {
    NewAuditEvent::new(
        AuditEventType::SystemEvent,
        AuditSeverity::Info,
        AuditResource::new("system"),
        action,
        AuditResult::Success,
    )
}

pub fn critical_event(action: &str) -> NewAuditEvent {
    NewAuditEvent::new(
        AuditEventType::SecurityEvent,
        AuditSeverity::Critical,
        AuditResource::new("security"),
        action,
        AuditResult::Failure,
    )
}
