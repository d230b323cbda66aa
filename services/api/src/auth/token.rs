//! Signed, stateless session tokens (HS256 JWT).
//!
//! A token carries only the account id and its validity window. Nothing is kept
//! server-side, so a token stays valid until it expires even after logout.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Validity window of a session token: 7 days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "sub")]
    pub account_id: Uuid,
    /// Seconds since the Unix epoch.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Issues and verifies session tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, account_id: Uuid) -> ServiceResult<String> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issues a token as if it were created at `issued_at`.
    pub fn issue_at(&self, account_id: Uuid, issued_at: DateTime<Utc>) -> ServiceResult<String> {
        let claims = SessionClaims {
            account_id,
            issued_at: issued_at.timestamp(),
            expires_at: (issued_at + Duration::seconds(SESSION_TTL_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, account_id = %account_id, "Failed to encode session token");
            ServiceError::Internal("session token generation failed".to_string())
        })
    }

    /// Checks signature and expiry. Every failure is [`ServiceError::InvalidToken`].
    pub fn verify(&self, token: &str) -> ServiceResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => debug!("Session token expired"),
                    kind => debug!(reason = ?kind, "Session token rejected"),
                }
                ServiceError::InvalidToken
            })?;
        Ok(data.claims)
    }
}
