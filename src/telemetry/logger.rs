// src/telemetry/logger.rs
//! Context-carrying logger on top of `tracing`.
//!
//! A [`Logger`] owns a [`LogContext`] (correlation id, service, environment,
//! ...) and attaches it to every record it emits. Child loggers inherit and
//! override the parent's context without touching the parent.
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::Level;
use uuid::Uuid;

pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_KEYS: [&str; 8] = [
    "password",
    "token",
    "apikey",
    "secret",
    "creditcard",
    "ssn",
    "authorization",
    "cookie",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogContext {
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub request_id: Option<String>,
    pub service: Option<String>,
    pub environment: Option<String>,
    pub component: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl LogContext {
    #[must_use]
    pub fn service(service: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            environment: Some(environment.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn component(component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            ..Self::default()
        }
    }

    pub fn correlated(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// `overlay` wins wherever it sets a value.
    fn merged(&self, overlay: LogContext) -> LogContext {
        let mut fields = self.fields.clone();
        fields.extend(overlay.fields);
        LogContext {
            correlation_id: overlay.correlation_id.or_else(|| self.correlation_id.clone()),
            user_id: overlay.user_id.or_else(|| self.user_id.clone()),
            request_id: overlay.request_id.or_else(|| self.request_id.clone()),
            service: overlay.service.or_else(|| self.service.clone()),
            environment: overlay.environment.or_else(|| self.environment.clone()),
            component: overlay.component.or_else(|| self.component.clone()),
            fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    context: LogContext,
}

impl Logger {
    #[must_use]
    pub fn new(mut context: LogContext) -> Self {
        if context.correlation_id.is_none() {
            context.correlation_id = Some(Uuid::new_v4().to_string());
        }
        Self { context }
    }

    pub fn child(&self, context: LogContext) -> Logger {
        Logger {
            context: self.context.merged(context),
        }
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.context.correlation_id.as_deref()
    }

    pub fn set_correlation_id(&mut self, correlation_id: impl Into<String>) {
        self.context.correlation_id = Some(correlation_id.into());
    }

    pub fn trace(&self, message: &str, data: Option<Value>) {
        self.emit(Level::TRACE, message, data, None);
    }

    pub fn debug(&self, message: &str, data: Option<Value>) {
        self.emit(Level::DEBUG, message, data, None);
    }

    pub fn info(&self, message: &str, data: Option<Value>) {
        self.emit(Level::INFO, message, data, None);
    }

    pub fn warn(&self, message: &str, data: Option<Value>) {
        self.emit(Level::WARN, message, data, None);
    }

    pub fn error(
        &self,
        message: &str,
        err: &(dyn std::error::Error + 'static),
        data: Option<Value>,
    ) {
        self.emit(Level::ERROR, message, data, Some(describe_error(err)));
    }

    /// Error record for failures that only exist as text (panic payloads,
    /// rendered error messages).
    pub fn error_message(&self, message: &str, error: &str, data: Option<Value>) {
        self.emit(Level::ERROR, message, data, Some(error.to_string()));
    }

    /// Context fields and `data` merged into one redacted JSON payload.
    pub fn enrich(&self, data: Option<Value>) -> Option<Value> {
        let mut payload = Map::new();
        for (key, value) in &self.context.fields {
            payload.insert(key.clone(), Value::String(value.clone()));
        }
        match data {
            Some(Value::Object(map)) => payload.extend(map),
            Some(Value::Null) | None => {}
            Some(other) => {
                payload.insert("data".into(), other);
            }
        }
        if payload.is_empty() {
            None
        } else {
            Some(redact(Value::Object(payload)))
        }
    }

    fn emit(&self, level: Level, message: &str, data: Option<Value>, error: Option<String>) {
        let ctx = &self.context;
        let data = self.enrich(data).map(|value| value.to_string());

        macro_rules! record {
            ($lvl:expr) => {
                tracing::event!(
                    $lvl,
                    correlation_id = ctx.correlation_id.as_deref(),
                    service = ctx.service.as_deref(),
                    environment = ctx.environment.as_deref(),
                    component = ctx.component.as_deref(),
                    user_id = ctx.user_id.as_deref(),
                    request_id = ctx.request_id.as_deref(),
                    data = data.as_deref(),
                    error = error.as_deref(),
                    "{}",
                    message
                )
            };
        }

        match level {
            Level::TRACE => record!(Level::TRACE),
            Level::DEBUG => record!(Level::DEBUG),
            Level::INFO => record!(Level::INFO),
            Level::WARN => record!(Level::WARN),
            _ => record!(Level::ERROR),
        }
    }
}

/// Replaces the value of every sensitive key, at any depth, with
/// [`REDACTED`]. Keys compare case-insensitively.
pub fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if is_sensitive(&key) {
                        (key, Value::String(REDACTED.into()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

fn is_sensitive(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_KEYS.contains(&lowered.as_str())
}

fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
