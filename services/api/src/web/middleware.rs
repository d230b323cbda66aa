//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::web::cookie::token_from_headers;
use crate::web::state::AppState;

/// Middleware that resolves the `token` cookie to an account.
///
/// If valid, inserts the [`glucose_core::Account`] into request extensions so
/// handlers scope every read and write by it. Otherwise the request stops here
/// with the classified error (401, or 500 when the store is down).
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = token_from_headers(req.headers()).map(str::to_owned);

    let account = state.authority.authenticate(token.as_deref()).await?;

    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}
