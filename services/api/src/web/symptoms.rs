//! services/api/src/web/symptoms.rs
//!
//! Owner-scoped symptom log endpoints. Each logged item counts as one reading of
//! its severity when the statistics are computed.

use std::collections::BTreeMap;
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
    stats::symptom_readings, summarize, validation::validate_symptom_entry,
    Account, NewSymptomEntry, ReadingQuery, SeriesKind, Summary, SymptomEntry, SymptomItem,
    SymptomKind,
};
use serde::{Deserialize, Serialize};
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
pub struct SymptomItemRequest {
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "energy")]
    pub kind: SymptomKind,
    /// 1 (mild) to 10 (severe)
    pub severity: i32,
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SymptomEntryRequest {
    #[schema(example = "2025-11-03")]
    pub date: NaiveDate,
    #[serde(default)]
    pub symptoms: Vec<SymptomItemRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<SymptomEntryRequest> for NewSymptomEntry {
    fn from(req: SymptomEntryRequest) -> Self {
        NewSymptomEntry {
            date: req.date,
            symptoms: req
                .symptoms
                .into_iter()
                .map(|item| SymptomItem {
                    kind: item.kind,
                    severity: item.severity,
                    description: item.description.trim().to_string(),
                })
                .collect(),
            notes: req.notes,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Only entries logged on this day.
    pub date: Option<NaiveDate>,
    /// 1 to 500, default 50.
    pub limit: Option<usize>,
}

impl ListParams {
    fn to_query(&self) -> ServiceResult<ReadingQuery> {
        let day = match self.date {
            Some(d) => Some(day_span("date", d)?),
            None => None,
        };
        Ok(ReadingQuery {
            start: day.map(|(start, _)| start),
            end: day.map(|(_, end)| end),
            limit: Some(list_limit(self.limit)?),
            ..Default::default()
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomStatistics {
    #[serde(flatten)]
    pub summary: Summary,
    pub total_entries: usize,
    pub symptom_counts: BTreeMap<String, usize>,
    pub date_range: DateRange,
}

/// How many logged items of each symptom type the entries hold.
fn count_by_kind(entries: &[SymptomEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in entries.iter().flat_map(|e| &e.symptoms) {
        *counts.entry(item.kind.to_string()).or_insert(0) += 1;
    }
    counts
}

fn validated(req: SymptomEntryRequest) -> ServiceResult<NewSymptomEntry> {
    let entry = NewSymptomEntry::from(req);
    validate_symptom_entry(&entry)?;
    Ok(entry)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/symptoms - Log symptoms for a day
#[utoipa::path(
    post,
    path = "/api/symptoms",
    request_body = SymptomEntryRequest,
    responses(
        (status = 201, description = "Entry created"),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    payload: Result<Json<SymptomEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let entry = validated(json_body(payload)?)?;
    let created = state.symptoms.insert_symptom(account.id, entry).await?;
    Ok((StatusCode::CREATED, DataResponse::new(created)))
}

/// GET /api/symptoms - List entries, newest first
#[utoipa::path(
    get,
    path = "/api/symptoms",
    params(ListParams),
    responses(
        (status = 200, description = "Entries of the authenticated account"),
        (status = 400, description = "Invalid filter or limit"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let params = query_params(params)?;
    let entries = state
        .symptoms
        .find_symptoms(account.id, &params.to_query()?)
        .await?;
    Ok(ListResponse::new(entries))
}

/// GET /api/symptoms/stats - Severity summary of the last `days` days
#[utoipa::path(
    get,
    path = "/api/symptoms/stats",
    params(WindowParams),
    responses(
        (status = 200, description = "Severity summary, entry total and per-type counts"),
        (status = 400, description = "Invalid window"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let days = query_params(params)?.days()?;
    let date_range = WindowParams::range(days)?;

    let entries = state
        .symptoms
        .find_symptoms(account.id, &ReadingQuery::since(date_range.start))
        .await?;

    Ok(DataResponse::new(SymptomStatistics {
        summary: summarize(SeriesKind::Symptom, &symptom_readings(&entries), days),
        total_entries: entries.len(),
        symptom_counts: count_by_kind(&entries),
        date_range,
    }))
}

/// GET /api/symptoms/{id} - Fetch one entry
#[utoipa::path(
    get,
    path = "/api/symptoms/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry"),
        (status = 404, description = "No such entry for this account")
    )
)]
pub async fn get_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let entry = state.symptoms.get_symptom(account.id, id).await?;
    Ok(DataResponse::new(entry))
}

/// PUT /api/symptoms/{id} - Replace one entry
#[utoipa::path(
    put,
    path = "/api/symptoms/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    request_body = SymptomEntryRequest,
    responses(
        (status = 200, description = "Entry updated"),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "No such entry for this account")
    )
)]
pub async fn update_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SymptomEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    let entry = validated(json_body(payload)?)?;
    let updated = state.symptoms.update_symptom(account.id, id, entry).await?;
    Ok(DataResponse::new(updated))
}

/// DELETE /api/symptoms/{id} - Remove one entry
#[utoipa::path(
    delete,
    path = "/api/symptoms/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "No such entry for this account")
    )
)]
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = path_param(id)?;
    state.symptoms.delete_symptom(account.id, id).await?;
    Ok(MessageResponse::new("Symptom entry deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use glucose_core::domain::timestamp_of;

    fn entry(kinds: &[SymptomKind]) -> SymptomEntry {
        SymptomEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            symptoms: kinds
                .iter()
                .map(|&kind| SymptomItem {
                    kind,
                    severity: 3,
                    description: "noted".into(),
                })
                .collect(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn counts_items_per_type() {
        let entries = vec![
            entry(&[SymptomKind::Energy, SymptomKind::Mood]),
            entry(&[SymptomKind::Energy]),
        ];
        let counts = count_by_kind(&entries);
        assert_eq!(counts.get("energy"), Some(&2));
        assert_eq!(counts.get("mood"), Some(&1));
        assert!(!counts.contains_key("physical"));
    }

    #[test]
    fn date_filter_spans_one_day() {
        let params = ListParams {
            date: NaiveDate::from_ymd_opt(2025, 11, 2),
            limit: Some(5),
        };
        let query = params.to_query().unwrap();
        assert!(query.contains(timestamp_of(NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(), None)));
        assert!(!query.contains(timestamp_of(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(), None)));
        assert!(!query.contains(timestamp_of(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(), None)));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn oversized_limit_is_a_field_error() {
        let params = ListParams {
            date: None,
            limit: Some(usize::MAX),
        };
        match params.to_query() {
            Err(ServiceError::Validation(errors)) => assert!(errors.has("limit")),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
