//! services/api/src/web/extract.rs
//!
//! Request extractors shared by the handlers.

use std::{convert::Infallible, fmt, net::SocketAddr};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        ConnectInfo, FromRequestParts, Path, Query,
    },
    http::request::Parts,
    Json,
};
use glucose_core::ValidationErrors;

use crate::error::{ServiceError, ServiceResult};

/// Best-effort client address for audit logs: first `X-Forwarded-For` hop, then
/// the socket peer, else `unknown`.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIp(ip))
    }
}

fn malformed(field: &str, detail: String) -> ServiceError {
    let mut errors = ValidationErrors::new();
    errors.push(field, detail);
    ServiceError::Validation(errors)
}

/// Unwraps a JSON body, turning axum's rejection into a validation error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServiceResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| malformed("body", rejection.body_text()))
}

pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ServiceResult<T> {
    params
        .map(|Query(q)| q)
        .map_err(|rejection| malformed("query", rejection.body_text()))
}

pub fn path_param<T>(path: Result<Path<T>, PathRejection>) -> ServiceResult<T> {
    path.map(|Path(p)| p)
        .map_err(|rejection| malformed("id", rejection.body_text()))
}
