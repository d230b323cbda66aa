//! services/api/src/web/meal_plans.rs
//!
//! Owner-scoped meal plans and the shopping lists derived from them.

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
use chrono::NaiveDate;
use glucose_core::{
    nutrition::shopping_list, validation::validate_meal_plan, Account, MealPlanQuery,
    NewMealPlan, PlannedDay, ValidationErrors,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::web::extract::{json_body, path_param, query_params};
use crate::web::params::list_limit;
use crate::web::rest::{DataResponse, ListResponse, MessageResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRequest {
    #[schema(example = "Semana baja en azúcar")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = "2025-11-03")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-11-09")]
    pub end_date: NaiveDate,
    /// Days of the plan, each with its meals and their foods.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub meals: Vec<PlannedDay>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<MealPlanRequest> for NewMealPlan {
    fn from(req: MealPlanRequest) -> Self {
        NewMealPlan {
            name: req.name.trim().to_string(),
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            meals: req.meals,
            is_active: req.is_active,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MealPlanListParams {
    /// Only plans running on this day.
    pub date: Option<NaiveDate>,
    /// 1 to 500, default 50.
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShoppingListParams {
    /// Together with `endDate`, only plans lying entirely inside the span.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ShoppingListParams {
    fn to_query(&self) -> ServiceResult<MealPlanQuery> {
        let mut errors = ValidationErrors::new();
        let within = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => {
                errors.push("endDate", "End date cannot be before the start date");
                None
            }
            (Some(start), Some(end)) => Some((start, end)),
            (Some(_), None) => {
                errors.push("endDate", "endDate is required with startDate");
                None
            }
            (None, Some(_)) => {
                errors.push("startDate", "startDate is required with endDate");
                None
            }
            (None, None) => None,
        };
        errors.into_result()?;
        Ok(MealPlanQuery {
            within,
            ..Default::default()
        })
    }
}

fn validated(req: MealPlanRequest) -> ServiceResult<NewMealPlan> {
    let plan = NewMealPlan::from(req);
    validate_meal_plan(&plan)?;
    Ok(plan)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/meal-plans - Create a meal plan
#[utoipa::path(
    post,
    path = "/api/meal-plans",
    request_body = MealPlanRequest,
    responses(
        (status = 201, description = "Meal plan created"),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    payload: Result<Json<MealPlanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let plan = validated(json_body(payload)?)?;
    let created = state.meal_plans.insert_meal_plan(account.id, plan).await?;
    debug!(account_id = %account.id, meal_plan_id = %created.id, "Meal plan created");
    Ok((StatusCode::CREATED, DataResponse::new(created)))
}

/// GET /api/meal-plans - List meal plans, newest first
#[utoipa::path(
    get,
    path = "/api/meal-plans",
    params(MealPlanListParams),
    responses(
        (status = 200, description = "Meal plans of the authenticated account"),
        (status = 400, description = "Invalid filter or limit"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_meal_plans_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<MealPlanListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let params = query_params(params)?;
    let query = MealPlanQuery {
        covering: params.date,
        within: None,
        limit: Some(list_limit(params.limit)?),
    };
    let plans = state.meal_plans.find_meal_plans(account.id, &query).await?;
    Ok(ListResponse::new(plans))
}

/// GET /api/meal-plans/shopping-list - Shopping list across plans
#[utoipa::path(
    get,
    path = "/api/meal-plans/shopping-list",
    params(ShoppingListParams),
    responses(
        (status = 200, description = "Foods grouped by name and portion with their quantity"),
        (status = 400, description = "Invalid date span"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn shopping_list_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<ShoppingListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let query = query_params(params)?.to_query()?;
    let plans = state.meal_plans.find_meal_plans(account.id, &query).await?;
    Ok(ListResponse::new(shopping_list(&plans)))
}

/// GET /api/meal-plans/{id} - Fetch one meal plan
#[utoipa::path(
    get,
    path = "/api/meal-plans/{id}",
    params(("id" = Uuid, Path, description = "Meal plan id")),
    responses(
        (status = 200, description = "The meal plan"),
        (status = 404, description = "No such meal plan for this account")
    )
)]
pub async fn get_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let plan = state.meal_plans.get_meal_plan(account.id, id).await?;
    Ok(DataResponse::new(plan))
}

/// GET /api/meal-plans/{id}/shopping-list - Shopping list of one plan
#[utoipa::path(
    get,
    path = "/api/meal-plans/{id}/shopping-list",
    params(("id" = Uuid, Path, description = "Meal plan id")),
    responses(
        (status = 200, description = "Foods grouped by name and portion with their quantity"),
        (status = 404, description = "No such meal plan for this account")
    )
)]
pub async fn plan_shopping_list_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let plan = state.meal_plans.get_meal_plan(account.id, id).await?;
    Ok(ListResponse::new(shopping_list(std::slice::from_ref(&plan))))
}

/// PUT /api/meal-plans/{id} - Replace one meal plan
#[utoipa::path(
    put,
    path = "/api/meal-plans/{id}",
    params(("id" = Uuid, Path, description = "Meal plan id")),
    request_body = MealPlanRequest,
    responses(
        (status = 200, description = "Meal plan updated"),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "No such meal plan for this account")
    )
)]
pub async fn update_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MealPlanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let plan = validated(json_body(payload)?)?;
    let updated = state.meal_plans.update_meal_plan(account.id, id, plan).await?;
    Ok(DataResponse::new(updated))
}

/// DELETE /api/meal-plans/{id} - Remove one meal plan
#[utoipa::path(
    delete,
    path = "/api/meal-plans/{id}",
    params(("id" = Uuid, Path, description = "Meal plan id")),
    responses(
        (status = 200, description = "Meal plan deleted"),
        (status = 404, description = "No such meal plan for this account")
    )
)]
pub async fn delete_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    state.meal_plans.delete_meal_plan(account.id, id).await?;
    Ok(MessageResponse::new("Meal plan deleted"))
}
