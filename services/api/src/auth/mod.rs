//! services/api/src/auth/mod.rs
//!
//! The credential and session authority: registration, login and per-request
//! token verification. It knows nothing about HTTP; the web layer turns its
//! results into cookies and status codes.

pub mod password;
pub mod token;

use std::sync::Arc;

use glucose_core::{
    domain::normalize_email,
    validation::{validate_profile_update, validate_registration, RegistrationInput},
    Account, AccountStore, DiabetesType, NewAccount, PortError, Preferences, ProfileUpdate,
};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
pub use password::PasswordHasher;
pub use token::{SessionClaims, TokenSigner, SESSION_TTL_SECS};

/// Everything needed to create an account. The password is plaintext here and
/// only leaves this struct as an Argon2 hash.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
}

/// A verified account together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub token: String,
}

pub struct Authority {
    accounts: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    signer: TokenSigner,
}

impl Authority {
    pub fn new(accounts: Arc<dyn AccountStore>, secret: &str) -> ServiceResult<Self> {
        Ok(Self {
            accounts,
            hasher: PasswordHasher::new()?,
            signer: TokenSigner::new(secret),
        })
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Creates an account and signs it in.
    ///
    /// A second registration with the same email (in any letter case) fails with
    /// [`ServiceError::DuplicateAccount`], including when two requests race past
    /// the lookup and the store's unique index decides.
    pub async fn register(&self, registration: Registration) -> ServiceResult<Session> {
        validate_registration(&RegistrationInput {
            name: &registration.name,
            email: &registration.email,
            password: &registration.password,
            age: registration.age,
            initial_glucose_level: registration.initial_glucose_level,
        })?;

        let email = normalize_email(&registration.email);
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::DuplicateAccount);
        }

        let password_hash = self.hash_blocking(registration.password).await?;
        let account = self
            .accounts
            .insert_account(NewAccount {
                name: registration.name.trim().to_string(),
                email,
                password_hash,
                age: registration.age,
                diabetes_type: registration.diabetes_type,
                initial_glucose_level: registration.initial_glucose_level,
                preferences: Preferences::default(),
            })
            .await
            .map_err(|e| match e {
                PortError::Duplicate(_) => ServiceError::DuplicateAccount,
                other => other.into(),
            })?;

        info!(account_id = %account.id, "Account registered");
        let token = self.signer.issue(account.id)?;
        Ok(Session { account, token })
    }

    /// Verifies credentials. An unknown email and a wrong password both end in
    /// [`ServiceError::InvalidCredentials`] after the same amount of hashing work.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<Session> {
        let email = normalize_email(email);
        let credentials = self.accounts.find_by_email(&email).await?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || match credentials {
            Some(creds) => hasher
                .verify_password(&password, &creds.password_hash)
                .map(|ok| ok.then_some(creds.account)),
            None => {
                hasher.verify_dummy_password(&password);
                Ok(None)
            }
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("password verification task failed: {e}")))??;

        let account = verified.ok_or(ServiceError::InvalidCredentials)?;
        debug!(account_id = %account.id, "Login succeeded");
        let token = self.signer.issue(account.id)?;
        Ok(Session { account, token })
    }

    /// Resolves a presented token to a live account.
    ///
    /// A store failure is reported as [`ServiceError::StoreUnavailable`] and never
    /// treated as an authenticated request.
    pub async fn authenticate(&self, token: Option<&str>) -> ServiceResult<Account> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ServiceError::Unauthenticated)?;
        let claims = self.signer.verify(token)?;

        match self.accounts.find_by_id(claims.account_id).await {
            Ok(Some(account)) => Ok(account),
            Ok(None) => {
                debug!(account_id = %claims.account_id, "Token references a missing account");
                Err(ServiceError::AccountNotFound)
            }
            Err(e) => {
                error!(error = %e, "Account lookup failed during authentication");
                Err(ServiceError::StoreUnavailable(e.to_string()))
            }
        }
    }

    /// Applies a profile update to the authenticated account.
    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> ServiceResult<Account> {
        validate_profile_update(&update)?;
        let account = self.accounts.update_account(id, update).await.map_err(|e| match e {
            PortError::NotFound(_) => ServiceError::AccountNotFound,
            other => other.into(),
        })?;
        Ok(account)
    }

    async fn hash_blocking(&self, password: String) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))?
    }
}

/// An account store whose backend is always down.
#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;
    use glucose_core::{
        Account, AccountCredentials, AccountStore, NewAccount, PortError, PortResult,
        ProfileUpdate,
    };
    use uuid::Uuid;

    pub struct UnavailableAccounts;

    fn down<T>() -> PortResult<T> {
        Err(PortError::Unavailable("connection refused".to_string()))
    }

    #[async_trait]
    impl AccountStore for UnavailableAccounts {
        async fn find_by_email(&self, _email: &str) -> PortResult<Option<AccountCredentials>> {
            down()
        }

        async fn find_by_id(&self, _id: Uuid) -> PortResult<Option<Account>> {
            down()
        }

        async fn insert_account(&self, _account: NewAccount) -> PortResult<Account> {
            down()
        }

        async fn update_account(&self, _id: Uuid, _update: ProfileUpdate) -> PortResult<Account> {
            down()
        }
    }
}
