//! services/api/src/web/glucose.rs
//!
//! Owner-scoped glucose reading endpoints and their statistics.

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
    domain::timestamp_of, stats::Reading, summarize, validation::validate_glucose, Account,
    MealContext, NewGlucoseReading, ReadingQuery, SeriesKind, Summary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::web::extract::{json_body, path_param, query_params};
use crate::web::params::{day_span, list_limit, WindowParams};
use crate::web::rest::{DataResponse, DateRange, ListResponse, MessageResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseRequest {
    #[schema(example = "2025-11-03")]
    pub date: NaiveDate,
    #[serde(default)]
    #[schema(example = "07:30")]
    pub time: Option<String>,
    /// mg/dL
    pub level: f64,
    #[schema(value_type = String, example = "fasting")]
    pub meal_context: MealContext,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<GlucoseRequest> for NewGlucoseReading {
    fn from(req: GlucoseRequest) -> Self {
        NewGlucoseReading {
            date: req.date,
            time: req.time.map(|t| t.trim().to_string()),
            level: req.level,
            meal_context: req.meal_context,
            notes: req.notes,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    pub start_date: Option<NaiveDate>,
    /// Inclusive: the whole end day is part of the window.
    pub end_date: Option<NaiveDate>,
    /// 1 to 500, default 50.
    pub limit: Option<usize>,
}

impl ListParams {
    fn to_query(&self) -> ServiceResult<ReadingQuery> {
        let end = match self.end_date {
            Some(d) => Some(day_span("endDate", d)?.1),
            None => None,
        };
        Ok(ReadingQuery {
            start: self.start_date.map(|d| timestamp_of(d, None)),
            end,
            limit: Some(list_limit(self.limit)?),
            ..Default::default()
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseStatistics {
    #[serde(flatten)]
    pub summary: Summary,
    pub date_range: DateRange,
}

fn validated(req: GlucoseRequest) -> ServiceResult<NewGlucoseReading> {
    let reading = NewGlucoseReading::from(req);
    validate_glucose(&reading)?;
    Ok(reading)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/glucose - Record a glucose reading
#[utoipa::path(
    post,
    path = "/api/glucose",
    request_body = GlucoseRequest,
    responses(
        (status = 201, description = "Reading created"),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_reading_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    payload: Result<Json<GlucoseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let reading = validated(json_body(payload)?)?;
    let created = state.glucose.insert_glucose(account.id, reading).await?;
    debug!(account_id = %account.id, reading_id = %created.id, "Glucose reading recorded");
    Ok((StatusCode::CREATED, DataResponse::new(created)))
}

/// GET /api/glucose - List readings, newest first
#[utoipa::path(
    get,
    path = "/api/glucose",
    params(ListParams),
    responses(
        (status = 200, description = "Readings of the authenticated account"),
        (status = 400, description = "Invalid filter or limit"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_readings_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let params = query_params(params)?;
    let readings = state
        .glucose
        .find_glucose(account.id, &params.to_query()?)
        .await?;
    Ok(ListResponse::new(readings))
}

/// GET /api/glucose/statistics - Summary of the last `days` days
#[utoipa::path(
    get,
    path = "/api/glucose/statistics",
    params(WindowParams),
    responses(
        (status = 200, description = "Average, extremes, trend, per-context figures and target bands"),
        (status = 400, description = "Invalid window"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn statistics_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let days = query_params(params)?.days()?;
    let date_range = WindowParams::range(days)?;

    let readings = state
        .glucose
        .find_glucose(account.id, &ReadingQuery::since(date_range.start))
        .await?;
    let series: Vec<Reading> = readings.iter().map(Reading::from).collect();

    Ok(DataResponse::new(GlucoseStatistics {
        summary: summarize(SeriesKind::Glucose, &series, days),
        date_range,
    }))
}

/// GET /api/glucose/{id} - Fetch one reading
#[utoipa::path(
    get,
    path = "/api/glucose/{id}",
    params(("id" = Uuid, Path, description = "Reading id")),
    responses(
        (status = 200, description = "The reading"),
        (status = 404, description = "No such reading for this account")
    )
)]
pub async fn get_reading_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let reading = state.glucose.get_glucose(account.id, id).await?;
    Ok(DataResponse::new(reading))
}

/// PUT /api/glucose/{id} - Replace one reading
#[utoipa::path(
    put,
    path = "/api/glucose/{id}",
    params(("id" = Uuid, Path, description = "Reading id")),
    request_body = GlucoseRequest,
    responses(
        (status = 200, description = "Reading updated"),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "No such reading for this account")
    )
)]
pub async fn update_reading_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<GlucoseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let reading = validated(json_body(payload)?)?;
    let updated = state.glucose.update_glucose(account.id, id, reading).await?;
    Ok(DataResponse::new(updated))
}

/// DELETE /api/glucose/{id} - Remove one reading
#[utoipa::path(
    delete,
    path = "/api/glucose/{id}",
    params(("id" = Uuid, Path, description = "Reading id")),
    responses(
        (status = 200, description = "Reading deleted"),
        (status = 404, description = "No such reading for this account")
    )
)]
pub async fn delete_reading_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    state.glucose.delete_glucose(account.id, id).await?;
    Ok(MessageResponse::new("Glucose reading deleted"))
}
