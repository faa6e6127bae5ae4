use crate::application::error::ApplicationResult;
use crate::domain::audit::AuditEvent;
use crate::domain::serde_time;
use std::borrow::Cow;

/// Returned by [`render_csv`] when there is nothing to export.
pub const EMPTY_CSV_EXPORT: &str = "No events to export";

pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "Timestamp",
    "Event Type",
    "Severity",
    "User ID",
    "IP Address",
    "Resource Type",
    "Resource ID",
    "Action",
    "Result",
];

/// Pretty-printed JSON array; `[]` when `events` is empty.
pub fn render_json(events: &[AuditEvent]) -> ApplicationResult<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// One header row plus one row per event, `\n` separated, no trailing
/// newline. Absent optional fields render as empty cells.
pub fn render_csv(events: &[AuditEvent]) -> String {
    if events.is_empty() {
        return EMPTY_CSV_EXPORT.to_string();
    }

    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for event in events {
        let id = event.id.to_string();
        let timestamp = serde_time::format(&event.timestamp);
        let cells = [
            id.as_str(),
            timestamp.as_str(),
            event.event_type.as_str(),
            event.severity.as_str(),
            event.actor.user_id.as_deref().unwrap_or(""),
            event.actor.ip_address.as_deref().unwrap_or(""),
            event.resource.resource_type.as_str(),
            event.resource.id.as_deref().unwrap_or(""),
            event.action.as_str(),
            event.result.as_str(),
        ];
        let row: Vec<Cow<'_, str>> = cells.into_iter().map(escape_cell).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
