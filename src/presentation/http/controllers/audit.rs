// src/presentation/http/controllers/audit.rs
use crate::application::dto::{CleanupResultDto, RetentionPolicyDto};
use crate::domain::audit::{
    AuditEventType, AuditFilter, AuditResource, AuditResult, AuditSeverity, NewAuditEvent,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{CorrelationId, RequestActor};
use crate::presentation::http::state::HttpState;
use crate::telemetry::{MetricsRegistry, metrics::MetricsResult};
use axum::{
    Extension, Json,
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

pub const EXPORTS_COUNTER: &str = "audit_exports_total";
pub const REMOVED_EVENTS_COUNTER: &str = "audit_events_removed_total";

/// Registers the audit endpoint counters. Call once per registry.
pub fn register_metrics(metrics: &MetricsRegistry) -> MetricsResult<()> {
    metrics.create_counter(EXPORTS_COUNTER, "Audit log exports by format", &["format"])?;
    metrics.create_counter(
        REMOVED_EVENTS_COUNTER,
        "Audit events removed by retention cleanup",
        &[],
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Anything but `csv` exports JSON.
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    fn disposition(self) -> &'static str {
        match self {
            Self::Json => "attachment; filename=audit-log.json",
            Self::Csv => "attachment; filename=audit-log.csv",
        }
    }
}

/// Raw query parameters. Values that do not parse are ignored rather than
/// rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// `json` (default) or `csv`.
    pub format: Option<String>,
    /// Dotted event type, e.g. `user.login`.
    pub event_type: Option<String>,
    pub user_id: Option<String>,
    pub resource_type: Option<String>,
    /// `info`, `warning` or `critical`.
    pub severity: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD`, inclusive.
    pub start_date: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD`, inclusive.
    pub end_date: Option<String>,
}

impl ExportParams {
    pub fn to_filter(&self) -> AuditFilter {
        AuditFilter {
            event_type: self
                .event_type
                .as_deref()
                .and_then(|value| value.parse().ok()),
            user_id: non_empty(self.user_id.as_deref()),
            resource_type: non_empty(self.resource_type.as_deref()),
            severity: self
                .severity
                .as_deref()
                .and_then(|value| value.parse().ok()),
            start_date: self.start_date.as_deref().and_then(parse_date),
            end_date: self.end_date.as_deref().and_then(parse_date),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_owned)
}

/// RFC 3339, or a bare `YYYY-MM-DD` meaning midnight UTC.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[utoipa::path(
    get,
    path = "/audit/export",
    params(ExportParams),
    responses(
        (status = 200, description = "Attachment with the matching events, JSON unless `format=csv`.",
            content((String = "application/json"), (String = "text/csv")))
    ),
    tag = "Audit"
)]
pub async fn export_audit_log(
    Extension(state): Extension<HttpState>,
    RequestActor(actor): RequestActor,
    correlation_id: CorrelationId,
    Query(params): Query<ExportParams>,
) -> HttpResult<Response> {
    let audit = state.services.audit_logger();
    let format = ExportFormat::parse(params.format.as_deref());
    let filter = params.to_filter();

    let document = match format {
        ExportFormat::Csv => audit.export_events_csv(Some(&filter)),
        ExportFormat::Json => audit.export_events(Some(&filter)).into_http()?,
    };

    audit.log_event(
        NewAuditEvent::new(
            AuditEventType::DataExported,
            AuditSeverity::Info,
            AuditResource::new("audit-log"),
            "export",
            AuditResult::Success,
        )
        .with_actor(actor)
        .with_correlation_id(Some(correlation_id.0))
        .with_metadata(Some(json!({ "format": format.as_str(), "filter": filter }))),
    );

    if let Some(counter) = state.metrics.counter(EXPORTS_COUNTER) {
        counter.with_label_values(&[format.as_str()]).inc();
    }

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CONTENT_DISPOSITION, format.disposition()),
        ],
        document,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/audit/retention",
    responses(
        (status = 200, description = "Retention window and the current cutoff.", body = RetentionPolicyDto)
    ),
    tag = "Audit"
)]
pub async fn retention_policy(Extension(state): Extension<HttpState>) -> Json<RetentionPolicyDto> {
    Json(state.services.audit_logger().retention_policy().into())
}

#[utoipa::path(
    post,
    path = "/audit/cleanup",
    responses(
        (status = 200, description = "Expired events removed.", body = CleanupResultDto)
    ),
    tag = "Audit"
)]
pub async fn cleanup(
    Extension(state): Extension<HttpState>,
    RequestActor(actor): RequestActor,
    correlation_id: CorrelationId,
) -> Json<CleanupResultDto> {
    let audit = state.services.audit_logger();
    let removed = audit.cleanup_old_events();

    audit.log_event(
        NewAuditEvent::new(
            AuditEventType::SystemEvent,
            AuditSeverity::Info,
            AuditResource::new("audit-log"),
            "cleanup",
            AuditResult::Success,
        )
        .with_actor(actor)
        .with_correlation_id(Some(correlation_id.0))
        .with_metadata(Some(json!({ "removedCount": removed }))),
    );

    if let Some(counter) = state.metrics.counter(REMOVED_EVENTS_COUNTER) {
        let removed = u32::try_from(removed).unwrap_or(u32::MAX);
        counter.with_label_values(&[]).inc_by(f64::from(removed));
    }

    Json(CleanupResultDto::completed(removed))
}
