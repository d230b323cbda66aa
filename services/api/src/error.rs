//! services/api/src/error.rs
//!
//! Defines the error types of the API service: `ApiError` for startup failures
//! and `ServiceError` for everything a request handler can return.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glucose_core::{FieldError, PortError, ValidationErrors};
use serde::Serialize;
use tracing::error;

/// The primary startup error type for the `api` binary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Every classified failure a request can end in.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("An account with this email already exists")]
    DuplicateAccount,

    /// Same message whether the email or the password was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid data")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Hashing or signing failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => ServiceError::NotFound(what),
            // Email is the only uniqueness constraint in the schema.
            PortError::Duplicate(_) => ServiceError::DuplicateAccount,
            PortError::Unavailable(detail) => ServiceError::StoreUnavailable(detail),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DuplicateAccount | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials
            | ServiceError::Unauthenticated
            | ServiceError::InvalidToken
            | ServiceError::AccountNotFound => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::StoreUnavailable(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            // Details stay in the log; the client gets a generic message.
            error!(error = %self, "Request failed with an internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let errors = match &self {
            ServiceError::Validation(errors) => Some(errors.errors()),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(ServiceError::DuplicateAccount.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::AccountNotFound.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServiceError::Validation(ValidationErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::StoreUnavailable("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn port_errors_are_classified() {
        assert!(matches!(
            ServiceError::from(PortError::Duplicate("email".into())),
            ServiceError::DuplicateAccount
        ));
        assert!(matches!(
            ServiceError::from(PortError::Unavailable("timeout".into())),
            ServiceError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn server_errors_hide_details() {
        let response = ServiceError::StoreUnavailable("password=hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
