//! crates/glucose_core/src/ports.rs
//!
//! Defines the storage contracts (traits) the service depends on.
//! These traits form the boundary of the hexagonal architecture, so the core
//! stays independent of the concrete database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Account, AccountCredentials, Food, FoodLog, FoodQuery, GlucoseReading, MealPlan, MealPlanQuery,
    NewAccount, NewFood, NewFoodLog, NewGlucoseReading, NewMealPlan, NewSymptomEntry, ProfileUpdate,
    ReadingQuery, SymptomEntry,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate item: {0}")]
    Duplicate(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Looks up an account by its normalized email, including the password hash.
    async fn find_by_email(&self, email: &str) -> PortResult<Option<AccountCredentials>>;

    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Account>>;

    /// Fails with [`PortError::Duplicate`] when the email is already taken.
    async fn insert_account(&self, account: NewAccount) -> PortResult<Account>;

    async fn update_account(&self, id: Uuid, update: ProfileUpdate) -> PortResult<Account>;
}

/// Glucose readings. Every method is scoped by the owner id; a reading owned by
/// someone else is reported as [`PortError::NotFound`].
#[async_trait]
pub trait GlucoseStore: Send + Sync {
    async fn find_glucose(&self, owner: Uuid, query: &ReadingQuery)
        -> PortResult<Vec<GlucoseReading>>;

    async fn get_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<GlucoseReading>;

    async fn insert_glucose(
        &self,
        owner: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading>;

    async fn update_glucose(
        &self,
        owner: Uuid,
        id: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading>;

    async fn delete_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<()>;
}

/// Symptom logs, scoped by owner exactly like [`GlucoseStore`].
#[async_trait]
pub trait SymptomStore: Send + Sync {
    async fn find_symptoms(&self, owner: Uuid, query: &ReadingQuery)
        -> PortResult<Vec<SymptomEntry>>;

    async fn get_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<SymptomEntry>;

    async fn insert_symptom(&self, owner: Uuid, entry: NewSymptomEntry)
        -> PortResult<SymptomEntry>;

    async fn update_symptom(
        &self,
        owner: Uuid,
        id: Uuid,
        entry: NewSymptomEntry,
    ) -> PortResult<SymptomEntry>;

    async fn delete_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<()>;
}

/// The shared food catalog. Reads are public; writes only happen when seeding.
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    /// Matching foods sorted by name.
    async fn list_foods(&self, query: &FoodQuery) -> PortResult<Vec<Food>>;

    async fn get_food(&self, id: Uuid) -> PortResult<Food>;

    async fn insert_food(&self, food: NewFood) -> PortResult<Food>;
}

/// Eaten foods. `ReadingQuery` bounds apply to `consumed_at`, newest first.
#[async_trait]
pub trait FoodLogStore: Send + Sync {
    async fn find_food_logs(&self, owner: Uuid, query: &ReadingQuery) -> PortResult<Vec<FoodLog>>;

    async fn get_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<FoodLog>;

    async fn insert_food_log(&self, owner: Uuid, log: NewFoodLog) -> PortResult<FoodLog>;

    async fn update_food_log(&self, owner: Uuid, id: Uuid, log: NewFoodLog)
        -> PortResult<FoodLog>;

    async fn delete_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<()>;
}

/// Meal plans, newest first.
#[async_trait]
pub trait MealPlanStore: Send + Sync {
    async fn find_meal_plans(&self, owner: Uuid, query: &MealPlanQuery)
        -> PortResult<Vec<MealPlan>>;

    async fn get_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<MealPlan>;

    async fn insert_meal_plan(&self, owner: Uuid, plan: NewMealPlan) -> PortResult<MealPlan>;

    async fn update_meal_plan(
        &self,
        owner: Uuid,
        id: Uuid,
        plan: NewMealPlan,
    ) -> PortResult<MealPlan>;

    async fn delete_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<()>;
}
