//! services/api/src/web/params.rs
//!
//! Query parameters shared by the list and statistics endpoints. Every bound is
//! checked here so date arithmetic and `LIMIT` values never leave their range.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use glucose_core::{domain::day_bounds, ValidationErrors};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ServiceError, ServiceResult};
use crate::web::rest::DateRange;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 500;
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Ten years.
pub const MAX_WINDOW_DAYS: u32 = 3650;

fn invalid(field: &str, message: &str) -> ServiceError {
    let mut errors = ValidationErrors::new();
    errors.push(field, message);
    errors.into()
}

/// The page size of a list request: 50 when absent, otherwise 1 to 500.
pub fn list_limit(limit: Option<usize>) -> ServiceResult<usize> {
    match limit {
        None => Ok(DEFAULT_LIST_LIMIT),
        Some(l) if (1..=MAX_LIST_LIMIT).contains(&l) => Ok(l),
        Some(_) => Err(invalid("limit", "Limit must be between 1 and 500")),
    }
}

/// First and last instant of `date`, reported against `field` when the day has
/// no successor.
pub fn day_span(field: &str, date: NaiveDate) -> ServiceResult<(DateTime<Utc>, DateTime<Utc>)> {
    day_bounds(date).ok_or_else(|| invalid(field, "Date is out of range"))
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowParams {
    /// Look-back window in days, from 1 to 3650. Defaults to 30.
    #[param(minimum = 1, maximum = 3650)]
    pub days: Option<u32>,
}

impl WindowParams {
    /// The requested window, rejecting zero and anything past ten years.
    pub fn days(&self) -> ServiceResult<u32> {
        match self.days.unwrap_or(DEFAULT_WINDOW_DAYS) {
            0 => Err(invalid("days", "Window must be at least one day")),
            days if days > MAX_WINDOW_DAYS => {
                Err(invalid("days", "Window cannot exceed 3650 days"))
            }
            days => Ok(days),
        }
    }

    /// The date range covered by a window of `days` ending now.
    pub fn range(days: u32) -> ServiceResult<DateRange> {
        let end = Utc::now();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| invalid("days", "Window reaches past the earliest supported date"))?;
        Ok(DateRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_bounded_on_both_sides() {
        assert!(matches!(
            WindowParams { days: Some(0) }.days(),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            WindowParams { days: Some(100_000_000) }.days(),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(WindowParams { days: None }.days().unwrap(), DEFAULT_WINDOW_DAYS);
        assert_eq!(
            WindowParams {
                days: Some(MAX_WINDOW_DAYS)
            }
            .days()
            .unwrap(),
            MAX_WINDOW_DAYS
        );
    }

    #[test]
    fn range_ends_now_and_spans_the_window() {
        let range = WindowParams::range(7).unwrap();
        assert_eq!(range.end - range.start, Duration::days(7));
        assert!(matches!(
            WindowParams::range(u32::MAX),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(list_limit(None).unwrap(), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(MAX_LIST_LIMIT)).unwrap(), MAX_LIST_LIMIT);
        for bad in [0, MAX_LIST_LIMIT + 1, usize::MAX] {
            match list_limit(Some(bad)) {
                Err(ServiceError::Validation(errors)) => assert!(errors.has("limit")),
                other => panic!("limit {bad} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn day_span_reports_the_field_at_the_edge_of_time() {
        match day_span("endDate", NaiveDate::MAX) {
            Err(ServiceError::Validation(errors)) => assert!(errors.has("endDate")),
            other => panic!("expected a validation error, got {other:?}"),
        }
        let (start, end) = day_span("date", NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()).unwrap();
        assert!(start < end);
    }
}
