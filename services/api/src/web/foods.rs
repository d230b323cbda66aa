//! services/api/src/web/foods.rs
//!
//! The public food catalog and the owner-scoped food log. A log keeps its own
//! copy of the nutrition facts, taken from the catalog when only a `foodId` is
//! sent.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use glucose_core::{
    nutrition::{nutrition_summary, NutritionSummary},
    validation::validate_food_log,
    Account, FoodCatalog, FoodFacts, FoodQuery, NewFoodLog, PortError, ReadingQuery,
    ValidationErrors,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::web::extract::{json_body, path_param, query_params};
use crate::web::params::{day_span, list_limit};
use crate::web::rest::{DataResponse, ListResponse, MessageResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Exact category; `todos` lists every category.
    pub category: Option<String>,
    /// Case-insensitive match on the name, category or a common name.
    pub search: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogRequest {
    /// Catalog entry to copy the nutrition facts from when `food` is absent.
    #[serde(default)]
    pub food_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub food: Option<FoodFacts>,
    #[schema(example = "1 taza")]
    pub portion: String,
    /// Defaults to now.
    #[serde(default)]
    pub consumed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FoodLogListParams {
    /// Only foods eaten on this day.
    pub date: Option<NaiveDate>,
    /// 1 to 500, default 50.
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// Day to summarize. Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub summary: NutritionSummary,
}

/// Settles the nutrition facts of a log: the body's own copy wins, otherwise
/// the catalog entry named by `foodId` is copied.
async fn resolve_food(
    catalog: &dyn FoodCatalog,
    food_id: Option<Uuid>,
    food: Option<FoodFacts>,
) -> ServiceResult<FoodFacts> {
    let mut errors = ValidationErrors::new();
    match (food, food_id) {
        (Some(food), _) => return Ok(food),
        (None, Some(id)) => match catalog.get_food(id).await {
            Ok(found) => return Ok(found.facts),
            Err(PortError::NotFound(_)) => errors.push("foodId", "No such food in the catalog"),
            Err(other) => return Err(other.into()),
        },
        (None, None) => errors.push("food", "Either food or foodId is required"),
    }
    Err(errors.into())
}

async fn validated(catalog: &dyn FoodCatalog, req: FoodLogRequest) -> ServiceResult<NewFoodLog> {
    let food = resolve_food(catalog, req.food_id, req.food).await?;
    let log = NewFoodLog {
        food_id: req.food_id,
        food,
        portion: req.portion.trim().to_string(),
        consumed_at: req.consumed_at.unwrap_or_else(Utc::now),
        notes: req.notes,
    };
    validate_food_log(&log)?;
    Ok(log)
}

//=========================================================================================
// Catalog Handlers
//=========================================================================================

/// GET /api/foods - Browse the catalog, sorted by name
#[utoipa::path(
    get,
    path = "/api/foods",
    params(CatalogParams),
    responses(
        (status = 200, description = "Matching foods")
    )
)]
pub async fn list_foods_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CatalogParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let params = query_params(params)?;
    let query = FoodQuery {
        category: params.category,
        search: params.search,
    };
    let foods = state.foods.list_foods(&query).await?;
    Ok(ListResponse::new(foods))
}

/// GET /api/foods/{id} - Fetch one catalog entry
#[utoipa::path(
    get,
    path = "/api/foods/{id}",
    params(("id" = Uuid, Path, description = "Food id")),
    responses(
        (status = 200, description = "The food"),
        (status = 404, description = "No such food")
    )
)]
pub async fn get_food_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let food = state.foods.get_food(id).await?;
    Ok(DataResponse::new(food))
}

//=========================================================================================
// Food Log Handlers
//=========================================================================================

/// POST /api/food-logs - Log a food
#[utoipa::path(
    post,
    path = "/api/food-logs",
    request_body = FoodLogRequest,
    responses(
        (status = 201, description = "Food logged"),
        (status = 400, description = "Invalid data or unknown foodId"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_food_log_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    payload: Result<Json<FoodLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let log = validated(state.foods.as_ref(), json_body(payload)?).await?;
    let created = state.food_logs.insert_food_log(account.id, log).await?;
    debug!(account_id = %account.id, food_log_id = %created.id, "Food logged");
    Ok((StatusCode::CREATED, DataResponse::new(created)))
}

/// GET /api/food-logs - List logged foods, newest first
#[utoipa::path(
    get,
    path = "/api/food-logs",
    params(FoodLogListParams),
    responses(
        (status = 200, description = "Food logs of the authenticated account"),
        (status = 400, description = "Invalid filter or limit"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_food_logs_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<FoodLogListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let params = query_params(params)?;
    let day = match params.date {
        Some(d) => Some(day_span("date", d)?),
        None => None,
    };
    let query = ReadingQuery {
        start: day.map(|(start, _)| start),
        end: day.map(|(_, end)| end),
        limit: Some(list_limit(params.limit)?),
        ..Default::default()
    };
    let logs = state.food_logs.find_food_logs(account.id, &query).await?;
    Ok(ListResponse::new(logs))
}

/// GET /api/food-logs/summary - Nutrition totals of one day
#[utoipa::path(
    get,
    path = "/api/food-logs/summary",
    params(SummaryParams),
    responses(
        (status = 200, description = "Carbohydrate, fiber and sugar totals, average glycemic index and traffic lights"),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn daily_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let date = query_params(params)?
        .date
        .unwrap_or_else(|| Utc::now().date_naive());
    let (start, end) = day_span("date", date)?;
    let query = ReadingQuery {
        start: Some(start),
        end: Some(end),
        ..Default::default()
    };
    let logs = state.food_logs.find_food_logs(account.id, &query).await?;
    Ok(DataResponse::new(DailyNutrition {
        date,
        summary: nutrition_summary(&logs),
    }))
}

/// GET /api/food-logs/{id} - Fetch one food log
#[utoipa::path(
    get,
    path = "/api/food-logs/{id}",
    params(("id" = Uuid, Path, description = "Food log id")),
    responses(
        (status = 200, description = "The food log"),
        (status = 404, description = "No such food log for this account")
    )
)]
pub async fn get_food_log_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let log = state.food_logs.get_food_log(account.id, id).await?;
    Ok(DataResponse::new(log))
}

/// PUT /api/food-logs/{id} - Replace one food log
#[utoipa::path(
    put,
    path = "/api/food-logs/{id}",
    params(("id" = Uuid, Path, description = "Food log id")),
    request_body = FoodLogRequest,
    responses(
        (status = 200, description = "Food log updated"),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "No such food log for this account")
    )
)]
pub async fn update_food_log_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<FoodLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let log = validated(state.foods.as_ref(), json_body(payload)?).await?;
    let updated = state.food_logs.update_food_log(account.id, id, log).await?;
    Ok(DataResponse::new(updated))
}

/// DELETE /api/food-logs/{id} - Remove one food log
#[utoipa::path(
    delete,
    path = "/api/food-logs/{id}",
    params(("id" = Uuid, Path, description = "Food log id")),
    responses(
        (status = 200, description = "Food log deleted"),
        (status = 404, description = "No such food log for this account")
    )
)]
pub async fn delete_food_log_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    state.food_logs.delete_food_log(account.id, id).await?;
    Ok(MessageResponse::new("Food log deleted"))
}
