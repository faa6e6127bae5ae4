// src/domain/audit/retention.rs
use chrono::{DateTime, Duration, Utc};

/// Age-based retention window. Events stamped strictly before the cutoff are
/// eligible for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub retention_days: u32,
    pub cutoff_date: DateTime<Utc>,
}

impl RetentionPolicy {
    #[must_use]
    pub fn at(retention_days: u32, now: DateTime<Utc>) -> Self {
        Self {
            retention_days,
            cutoff_date: now - Duration::days(i64::from(retention_days)),
        }
    }

    #[must_use]
    pub fn is_expired(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp < self.cutoff_date
    }
}
