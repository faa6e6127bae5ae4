use crate::domain::audit::RetentionPolicy;
use crate::domain::serde_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicyDto {
    pub retention_days: u32,
    #[serde(with = "serde_time")]
    pub cutoff_date: DateTime<Utc>,
}

impl From<RetentionPolicy> for RetentionPolicyDto {
    fn from(policy: RetentionPolicy) -> Self {
        Self {
            retention_days: policy.retention_days,
            cutoff_date: policy.cutoff_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResultDto {
    pub success: bool,
    pub removed_count: usize,
    pub message: String,
}

impl CleanupResultDto {
    #[must_use]
    pub fn completed(removed_count: usize) -> Self {
        Self {
            success: true,
            removed_count,
            message: format!("Cleaned up {removed_count} old audit events"),
        }
    }
}
