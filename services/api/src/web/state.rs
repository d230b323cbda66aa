//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::auth::Authority;
use crate::config::Config;
use crate::error::ServiceResult;
use glucose_core::ports::{
    AccountStore, FoodCatalog, FoodLogStore, GlucoseStore, MealPlanStore, SymptomStore,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<Authority>,
    pub glucose: Arc<dyn GlucoseStore>,
    pub symptoms: Arc<dyn SymptomStore>,
    pub foods: Arc<dyn FoodCatalog>,
    pub food_logs: Arc<dyn FoodLogStore>,
    pub meal_plans: Arc<dyn MealPlanStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every port to the same backing store.
    pub fn new<S>(store: Arc<S>, config: Arc<Config>) -> ServiceResult<Self>
    where
        S: AccountStore
            + GlucoseStore
            + SymptomStore
            + FoodCatalog
            + FoodLogStore
            + MealPlanStore
            + 'static,
    {
        let authority = Authority::new(store.clone(), &config.jwt_secret)?;
        Ok(Self {
            authority: Arc::new(authority),
            glucose: store.clone(),
            symptoms: store.clone(),
            foods: store.clone(),
            food_logs: store.clone(),
            meal_plans: store,
            config,
        })
    }
}
