//! crates/glucose_core/src/validation.rs
//!
//! Explicit per-entity input validation. Each function collects every problem it
//! finds instead of stopping at the first one.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::{
    FoodFacts, NewFoodLog, NewGlucoseReading, NewMealPlan, NewSymptomEntry, ProfileUpdate,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

pub const MIN_PASSWORD_LEN: usize = 6;
pub const AGE_RANGE: std::ops::RangeInclusive<i32> = 1..=120;
pub const GLUCOSE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=1000.0;
pub const SEVERITY_RANGE: std::ops::RangeInclusive<i32> = 1..=10;
pub const GLYCEMIC_INDEX_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field-level problem found in one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Registration input as the authority receives it, before hashing.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub age: Option<i32>,
    pub initial_glucose_level: Option<f64>,
}

pub fn validate_registration(input: &RegistrationInput<'_>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if input.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if input.email.trim().is_empty() {
        errors.push("email", "Email is required");
    } else if !EMAIL_RE.is_match(input.email.trim()) {
        errors.push("email", "Email is not a valid address");
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    check_age(&mut errors, input.age);
    check_glucose(&mut errors, "initialGlucoseLevel", input.initial_glucose_level);
    errors.into_result()
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        errors.push("name", "Name cannot be empty");
    }
    check_age(&mut errors, update.age);
    check_glucose(&mut errors, "initialGlucoseLevel", update.initial_glucose_level);
    errors.into_result()
}

pub fn validate_glucose(reading: &NewGlucoseReading) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_glucose(&mut errors, "level", Some(reading.level));
    if let Some(time) = reading.time.as_deref() {
        if !TIME_RE.is_match(time.trim()) {
            errors.push("time", "Time must use the HH:MM format");
        }
    }
    errors.into_result()
}

pub fn validate_symptom_entry(entry: &NewSymptomEntry) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (i, item) in entry.symptoms.iter().enumerate() {
        if !SEVERITY_RANGE.contains(&item.severity) {
            errors.push(
                format!("symptoms[{i}].severity"),
                "Severity must be between 1 and 10",
            );
        }
        if item.description.trim().is_empty() {
            errors.push(format!("symptoms[{i}].description"), "Description is required");
        }
    }
    errors.into_result()
}

pub fn validate_food_log(log: &NewFoodLog) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_food(&mut errors, "food", &log.food);
    if log.portion.trim().is_empty() {
        errors.push("portion", "Portion is required");
    }
    errors.into_result()
}

pub fn validate_meal_plan(plan: &NewMealPlan) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if plan.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if plan.end_date < plan.start_date {
        errors.push("endDate", "End date cannot be before the start date");
    }
    for (d, day) in plan.meals.iter().enumerate() {
        if day.day < plan.start_date || day.day > plan.end_date {
            errors.push(format!("meals[{d}].day"), "Day must fall inside the plan");
        }
        for (m, meal) in day.meals.iter().enumerate() {
            for (f, planned) in meal.foods.iter().enumerate() {
                let at = format!("meals[{d}].meals[{m}].foods[{f}]");
                check_food(&mut errors, &format!("{at}.food"), &planned.food);
                if planned.portion.trim().is_empty() {
                    errors.push(format!("{at}.portion"), "Portion is required");
                }
            }
        }
    }
    errors.into_result()
}

fn check_food(errors: &mut ValidationErrors, prefix: &str, food: &FoodFacts) {
    if food.name.trim().is_empty() {
        errors.push(format!("{prefix}.name"), "Food name is required");
    }
    if !GLYCEMIC_INDEX_RANGE.contains(&food.glycemic_index) {
        errors.push(
            format!("{prefix}.glycemicIndex"),
            "Glycemic index must be between 0 and 100",
        );
    }
    for (field, grams) in [
        ("carbohydrates", food.carbohydrates),
        ("fiber", food.fiber),
        ("sugars", food.sugars),
    ] {
        if grams.is_nan() || grams < 0.0 {
            errors.push(format!("{prefix}.{field}"), "Amount cannot be negative");
        }
    }
}

fn check_age(errors: &mut ValidationErrors, age: Option<i32>) {
    if age.is_some_and(|a| !AGE_RANGE.contains(&a)) {
        errors.push("age", "Age must be between 1 and 120");
    }
}

fn check_glucose(errors: &mut ValidationErrors, field: &str, level: Option<f64>) {
    if level.is_some_and(|l| !GLUCOSE_RANGE.contains(&l)) {
        errors.push(field, "Glucose level must be between 1 and 1000 mg/dL");
    }
}
