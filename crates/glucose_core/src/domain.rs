//! crates/glucose_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database driver or web framework.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// Diabetes classification an account may declare on its profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiabetesType {
    Type1,
    Type2,
    Gestational,
    Prediabetes,
    Other,
}

/// When a glucose measurement was taken relative to meals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MealContext {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Other,
}

/// Category of a logged symptom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SymptomKind {
    Energy,
    Mood,
    Physical,
    Other,
}

/// Nutritional traffic light of a catalog food.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

//=========================================================================================
// Accounts
//=========================================================================================

/// Per-channel notification switches. Every channel is on unless the user opts out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub medication_reminders: bool,
    pub meal_reminders: bool,
    pub educational_tips: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            medication_reminders: true,
            meal_reminders: true,
            educational_tips: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub dietary_restrictions: Vec<String>,
    pub favorite_foods: Vec<String>,
    pub notification_settings: NotificationSettings,
}

/// Represents an account - used throughout the app. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Always stored trimmed and lower-cased.
    pub email: String,
    pub age: Option<i32>,
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
}

/// Only used internally for login - contains the stored password hash.
#[derive(Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account", &self.account)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// The record handed to the account store on registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
    pub preferences: Preferences,
}

/// Profile fields an account may change about itself. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub diabetes_type: Option<DiabetesType>,
    pub initial_glucose_level: Option<f64>,
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    /// Applies the update onto an existing account in place.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name.trim().to_string();
        }
        if let Some(age) = self.age {
            account.age = Some(age);
        }
        if let Some(diabetes_type) = self.diabetes_type {
            account.diabetes_type = Some(diabetes_type);
        }
        if let Some(level) = self.initial_glucose_level {
            account.initial_glucose_level = Some(level);
        }
        if let Some(preferences) = self.preferences {
            account.preferences = preferences;
        }
    }
}

/// Trims and lower-cases an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

//=========================================================================================
// Readings
//=========================================================================================

/// Combines a calendar date with an optional `HH:MM` time into a UTC instant.
/// A missing or unparsable time means midnight.
pub fn timestamp_of(date: NaiveDate, time: Option<&str>) -> DateTime<Utc> {
    let time = time
        .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
        .unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}

/// A single glucose measurement owned by one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: Option<String>,
    /// mg/dL
    pub level: f64,
    pub meal_context: MealContext,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GlucoseReading {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        timestamp_of(self.date, self.time.as_deref())
    }
}

/// Client-supplied body for creating or replacing a glucose reading.
/// The owner always comes from the authenticated identity, never from here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGlucoseReading {
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    pub level: f64,
    pub meal_context: MealContext,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewGlucoseReading {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        timestamp_of(self.date, self.time.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomItem {
    #[serde(rename = "type")]
    pub kind: SymptomKind,
    /// 1 to 10
    pub severity: i32,
    pub description: String,
}

/// A day's symptom log owned by one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub symptoms: Vec<SymptomItem>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SymptomEntry {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        timestamp_of(self.date, None)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptomEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub symptoms: Vec<SymptomItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSymptomEntry {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        timestamp_of(self.date, None)
    }
}

//=========================================================================================
// Foods, Food Logs and Meal Plans
//=========================================================================================

/// Nutrition facts of one food portion. Logs and meal plans keep their own copy,
/// so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodFacts {
    pub name: String,
    pub category: String,
    /// 0 to 100
    pub glycemic_index: f64,
    /// grams per portion
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugars: f64,
    pub portion: String,
    pub traffic_light: TrafficLight,
}

/// A shared catalog entry. The catalog is not owned by any account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: Uuid,
    #[serde(flatten)]
    pub facts: FoodFacts,
    pub common_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub facts: FoodFacts,
    pub common_names: Vec<String>,
}

/// One food eaten by one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Catalog entry the facts were copied from, if any.
    pub food_id: Option<Uuid>,
    pub food: FoodFacts,
    /// Portion actually eaten, free text.
    pub portion: String,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFoodLog {
    pub food_id: Option<Uuid>,
    pub food: FoodFacts,
    pub portion: String,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFood {
    #[serde(default)]
    pub food_id: Option<Uuid>,
    pub food: FoodFacts,
    pub portion: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    #[serde(rename = "type")]
    pub kind: MealType,
    #[serde(default)]
    pub foods: Vec<PlannedFood>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedDay {
    pub day: NaiveDate,
    #[serde(default)]
    pub meals: Vec<PlannedMeal>,
}

/// A multi-day meal plan owned by one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meals: Vec<PlannedDay>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealPlan {
    /// Every planned food across all days and meals, in plan order.
    pub fn foods(&self) -> impl Iterator<Item = &PlannedFood> {
        self.meals
            .iter()
            .flat_map(|day| &day.meals)
            .flat_map(|meal| &meal.foods)
    }
}

#[derive(Debug, Clone)]
pub struct NewMealPlan {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meals: Vec<PlannedDay>,
    pub is_active: bool,
}

//=========================================================================================
// Queries
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    OldestFirst,
    #[default]
    NewestFirst,
}

/// Time-window filter for owner-scoped reading lookups. Both bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ReadingQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub order: SortOrder,
}

impl ReadingQuery {
    /// Everything recorded since `start`, oldest first. Used for statistics.
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
            limit: None,
            order: SortOrder::OldestFirst,
        }
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

/// First and last millisecond of a UTC calendar day, or `None` when the day
/// sits at the edge of the representable range.
pub fn day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = timestamp_of(date, None);
    let end = start.checked_add_signed(Duration::days(1) - Duration::milliseconds(1))?;
    Some((start, end))
}

/// Catalog filter. Both parts are optional; matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct FoodQuery {
    /// Exact category. `todos` and `all` mean no category filter.
    pub category: Option<String>,
    /// Substring of the name, category or one of the common names.
    pub search: Option<String>,
}

impl FoodQuery {
    /// The category to filter on, if any.
    pub fn category_filter(&self) -> Option<&str> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") | Some("todos") | Some("all") => None,
            Some(category) => Some(category),
        }
    }

    /// The lower-cased search term, if any.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, food: &Food) -> bool {
        let category_ok = self
            .category_filter()
            .map_or(true, |c| food.facts.category.eq_ignore_ascii_case(c));
        let search_ok = self.search_term().map_or(true, |term| {
            food.facts.name.to_lowercase().contains(&term)
                || food.facts.category.to_lowercase().contains(&term)
                || food
                    .common_names
                    .iter()
                    .any(|n| n.to_lowercase().contains(&term))
        });
        category_ok && search_ok
    }
}

/// Owner-scoped meal plan lookup.
#[derive(Debug, Clone, Default)]
pub struct MealPlanQuery {
    /// Only plans whose date span includes this day.
    pub covering: Option<NaiveDate>,
    /// Only plans lying entirely inside this inclusive span.
    pub within: Option<(NaiveDate, NaiveDate)>,
    pub limit: Option<usize>,
}

impl MealPlanQuery {
    pub fn matches(&self, plan: &MealPlan) -> bool {
        let covers = self
            .covering
            .map_or(true, |day| plan.start_date <= day && day <= plan.end_date);
        let inside = self
            .within
            .map_or(true, |(start, end)| plan.start_date >= start && plan.end_date <= end);
        covers && inside
    }
}
