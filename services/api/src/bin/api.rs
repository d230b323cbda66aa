//! services/api/src/bin/api.rs

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use glucose_api::{
    adapters::{DbAdapter, MemoryStore},
    config::{Config, ConfigError},
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use glucose_core::catalog::seed_catalog;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    if config.uses_fallback_secret() {
        warn!("JWT_SECRET is not set; signing session tokens with the built-in fallback secret");
    }

    // --- 2. Select the Store & Build the Shared AppState ---
    let app_state = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await?;
            let db_adapter = Arc::new(DbAdapter::new(db_pool));
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            AppState::new(db_adapter, config.clone())
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store. Data will not survive a restart.");
            AppState::new(Arc::new(MemoryStore::new()), config.clone())
        }
    }
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let seeded = seed_catalog(app_state.foods.as_ref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if seeded > 0 {
        info!(count = seeded, "Food catalog seeded");
    }

    // --- 3. Create the Web Router ---
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGINS".to_string(), e.to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(Arc::new(app_state)))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
