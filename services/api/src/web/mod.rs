//! services/api/src/web/mod.rs
//!
//! HTTP layer: handlers, the auth middleware and the router that ties them to
//! the shared state.

pub mod auth;
pub mod cookie;
pub mod extract;
pub mod foods;
pub mod glucose;
pub mod meal_plans;
pub mod middleware;
pub mod params;
pub mod rest;
pub mod state;
pub mod symptoms;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use middleware::require_auth;
pub use state::AppState;

/// Builds the `/api` router. CORS and Swagger UI are layered on by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(rest::health_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/foods", get(foods::list_foods_handler))
        .route("/api/foods/{id}", get(foods::get_food_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/api/auth/me",
            get(auth::me_handler).put(auth::update_me_handler),
        )
        .route(
            "/api/glucose",
            post(glucose::create_reading_handler).get(glucose::list_readings_handler),
        )
        .route("/api/glucose/statistics", get(glucose::statistics_handler))
        .route(
            "/api/glucose/{id}",
            get(glucose::get_reading_handler)
                .put(glucose::update_reading_handler)
                .delete(glucose::delete_reading_handler),
        )
        .route(
            "/api/symptoms",
            post(symptoms::create_entry_handler).get(symptoms::list_entries_handler),
        )
        .route("/api/symptoms/stats", get(symptoms::stats_handler))
        .route(
            "/api/symptoms/{id}",
            get(symptoms::get_entry_handler)
                .put(symptoms::update_entry_handler)
                .delete(symptoms::delete_entry_handler),
        )
        .route(
            "/api/food-logs",
            post(foods::create_food_log_handler).get(foods::list_food_logs_handler),
        )
        .route("/api/food-logs/summary", get(foods::daily_summary_handler))
        .route(
            "/api/food-logs/{id}",
            get(foods::get_food_log_handler)
                .put(foods::update_food_log_handler)
                .delete(foods::delete_food_log_handler),
        )
        .route(
            "/api/meal-plans",
            post(meal_plans::create_meal_plan_handler).get(meal_plans::list_meal_plans_handler),
        )
        .route(
            "/api/meal-plans/shopping-list",
            get(meal_plans::shopping_list_handler),
        )
        .route(
            "/api/meal-plans/{id}",
            get(meal_plans::get_meal_plan_handler)
                .put(meal_plans::update_meal_plan_handler)
                .delete(meal_plans::delete_meal_plan_handler),
        )
        .route(
            "/api/meal-plans/{id}/shopping-list",
            get(meal_plans::plan_shopping_list_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
