// src/presentation/http/extractors.rs
use crate::domain::audit::AuditActor;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;
use std::net::SocketAddr;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Correlation id of the current request. Set by the correlation middleware;
/// outside it, falls back to the request headers and then to a fresh id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = header_str(headers, CORRELATION_ID_HEADER)
            .or_else(|| header_str(headers, REQUEST_ID_HEADER))
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<CorrelationId>() {
            return Ok(id.clone());
        }
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Who is calling, as far as the boundary can tell. Nothing here is
/// authenticated.
#[derive(Debug, Clone, Default)]
pub struct RequestActor(pub AuditActor);

impl RequestActor {
    pub fn from_parts(parts: &Parts) -> Self {
        let headers = &parts.headers;
        let ip_address = header_str(headers, FORWARDED_FOR_HEADER)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Self(AuditActor {
            user_id: header_str(headers, USER_ID_HEADER).map(str::to_owned),
            ip_address,
            user_agent: header_str(headers, axum::http::header::USER_AGENT.as_str())
                .map(str::to_owned),
            ..AuditActor::default()
        })
    }

    pub fn into_inner(self) -> AuditActor {
        self.0
    }
}

impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
