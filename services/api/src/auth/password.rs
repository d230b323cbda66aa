//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$...`), so the
//! salt and parameters travel with the hash.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as ArgonError, PasswordHash, PasswordHasher as _,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use tracing::{debug, error};

use crate::error::{ServiceError, ServiceResult};

/// Salted one-way password hashing with a precomputed decoy hash.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Verified against when an email is unknown, so both failure paths cost the same.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new() -> ServiceResult<Self> {
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"glucose-dummy-password", &salt)
            .map_err(|e| ServiceError::Internal(format!("failed to prepare decoy hash: {e}")))?
            .to_string();
        Ok(Self { argon2, dummy_hash })
    }

    /// Hashes a password with a fresh random salt. The plaintext is never logged.
    pub fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "Password hashing operation failed");
                ServiceError::Internal("password hashing failed".to_string())
            })?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> ServiceResult<bool> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            error!(error = %e, "Stored password hash has an invalid format");
            ServiceError::Internal("stored password hash is malformed".to_string())
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => {
                error!(error = %e, "Password verification system error");
                Err(ServiceError::Internal("password verification failed".to_string()))
            }
        }
    }

    /// Burns one verification against the decoy hash. Always `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.dummy_hash);
        false
    }
}
