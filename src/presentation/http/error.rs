// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::telemetry::MetricsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Marker left on a 500 response so the error-audit middleware can record
/// the failure and rewrite the body. Carries the detail that must never
/// reach the client.
#[derive(Debug, Clone)]
pub struct UnhandledError {
    pub message: String,
}

/// Every failure that reaches the HTTP boundary is a server fault: request
/// input is parsed permissively and never rejected.
#[derive(Debug)]
pub enum HttpError {
    Internal(String),
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<MetricsError> for HttpError {
    fn from(err: MetricsError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let HttpError::Internal(detail) = self;
        let mut response = internal_error_response(None);
        response
            .extensions_mut()
            .insert(UnhandledError { message: detail });
        response
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Generic 500 with no internal details.
pub fn internal_error_response(correlation_id: Option<String>) -> Response {
    let body = ErrorBody {
        error: StatusCode::INTERNAL_SERVER_ERROR
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string(),
        message: INTERNAL_ERROR_MESSAGE.to_string(),
        correlation_id,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
