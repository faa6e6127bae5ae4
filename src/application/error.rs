// src/application/error.rs
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("audit export failed: {0}")]
    Export(#[from] serde_json::Error),

    /// One entry per sink, formatted as `<sink>: <error>`.
    #[error("failed to flush audit sinks: {}", .0.join("; "))]
    SinkFlush(Vec<String>),
}
