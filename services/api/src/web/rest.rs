//! services/api/src/web/rest.rs
//!
//! Shared response envelopes, the health probe, and the master definition for
//! the OpenAPI document.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, foods, glucose, meal_plans, symptoms};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        auth::update_me_handler,
        glucose::create_reading_handler,
        glucose::list_readings_handler,
        glucose::statistics_handler,
        glucose::get_reading_handler,
        glucose::update_reading_handler,
        glucose::delete_reading_handler,
        symptoms::create_entry_handler,
        symptoms::list_entries_handler,
        symptoms::stats_handler,
        symptoms::get_entry_handler,
        symptoms::update_entry_handler,
        symptoms::delete_entry_handler,
        foods::list_foods_handler,
        foods::get_food_handler,
        foods::create_food_log_handler,
        foods::list_food_logs_handler,
        foods::daily_summary_handler,
        foods::get_food_log_handler,
        foods::update_food_log_handler,
        foods::delete_food_log_handler,
        meal_plans::create_meal_plan_handler,
        meal_plans::list_meal_plans_handler,
        meal_plans::shopping_list_handler,
        meal_plans::get_meal_plan_handler,
        meal_plans::plan_shopping_list_handler,
        meal_plans::update_meal_plan_handler,
        meal_plans::delete_meal_plan_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::UpdateProfileRequest,
            auth::AccountView,
            auth::AuthResponse,
            glucose::GlucoseRequest,
            symptoms::SymptomEntryRequest,
            symptoms::SymptomItemRequest,
            foods::FoodLogRequest,
            meal_plans::MealPlanRequest,
        )
    ),
    tags(
        (name = "Glucose Tracker API", description = "Accounts, sessions, glucose readings, symptom logs, foods and meal plans.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Envelopes
//=========================================================================================

/// `{ "success": true, "data": ... }`
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// `{ "success": true, "count": n, "data": [...] }`
#[derive(Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: data.len(),
            data,
        })
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

/// The window a statistics payload was computed over.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /api/health - Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}
