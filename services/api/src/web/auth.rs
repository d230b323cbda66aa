//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and the current profile.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use glucose_core::{Account, DiabetesType, Preferences, ProfileUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Registration;
use crate::error::ServiceError;
use crate::web::cookie::{clear_session_cookie, session_cookie};
use crate::web::extract::{json_body, ClientIp};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "type2")]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default)]
    pub initial_glucose_level: Option<f64>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            name: req.name,
            email: req.email,
            password: req.password,
            age: req.age,
            diabetes_type: req.diabetes_type,
            initial_glucose_level: req.initial_glucose_level,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub preferences: Option<Preferences>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            age: req.age,
            diabetes_type: req.diabetes_type,
            initial_glucose_level: req.initial_glucose_level,
            preferences: req.preferences,
        }
    }
}

/// Public projection of an account. Never includes the password hash.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            age: account.age,
            diabetes_type: account.diabetes_type,
            initial_glucose_level: account.initial_glucose_level,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: AccountView,
}

impl AuthResponse {
    fn for_account(account: &Account) -> Self {
        Self {
            success: true,
            message: None,
            user: AccountView::from(account),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new account and sign it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid data or the email is already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    client_ip: ClientIp,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = json_body(payload)?;
    let email = req.email.clone();

    let session = state
        .authority
        .register(req.into())
        .await
        .inspect_err(|e| {
            warn!(email = %email, client_ip = %client_ip, error = %e, "Registration failed");
        })?;

    info!(account_id = %session.account.id, client_ip = %client_ip, "Registration succeeded");
    let cookie = session_cookie(&session.token, state.config.is_production());
    let response = AuthResponse {
        message: Some("Account registered successfully".to_string()),
        ..AuthResponse::for_account(&session.account)
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /api/auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    client_ip: ClientIp,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let req = json_body(payload)?;

    let session = state
        .authority
        .login(&req.email, &req.password)
        .await
        .inspect_err(|e| {
            warn!(email = %req.email, client_ip = %client_ip, error = %e, "Login failed");
        })?;

    info!(account_id = %session.account.id, client_ip = %client_ip, "Login succeeded");
    let cookie = session_cookie(&session.token, state.config.is_production());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::for_account(&session.account)),
    ))
}

/// POST /api/auth/logout - Clear the session cookie
///
/// Tokens are stateless, so an already-issued token stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.is_production());
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "success": true, "message": "Logged out" })),
    )
}

/// GET /api/auth/me - The authenticated account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = AuthResponse),
        (status = 401, description = "Missing, invalid or orphaned session token")
    )
)]
pub async fn me_handler(Extension(account): Extension<Account>) -> Json<AuthResponse> {
    Json(AuthResponse::for_account(&account))
}

/// PUT /api/auth/me - Update the authenticated account's profile
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = AuthResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let req = json_body(payload)?;
    let updated = state
        .authority
        .update_profile(account.id, req.into())
        .await?;
    Ok(Json(AuthResponse::for_account(&updated)))
}
