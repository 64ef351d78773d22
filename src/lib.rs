//! Continental Admin core
//!
//! Metadata-driven administration core: a registry of model descriptors
//! from which forms, grids and validation rules are generated, a REST
//! client for the admin backend, and list-view CRUD state.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod crud;
pub mod errors;
pub mod forms;
pub mod grid;
pub mod models;
pub mod registry;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use registry::ModelRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub config: Arc<Config>,
}

/// Create the metadata API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/models", get(api::list_models))
        .route("/models/{name}", get(api::get_model))
        .route("/models/{name}/form", get(api::get_form))
        .route("/models/{name}/form/layout", get(api::get_form_layout))
        .route("/models/{name}/grid", get(api::get_grid))
        .route("/models/{name}/columns", get(api::get_columns))
        .route("/models/{name}/toolbar", get(api::get_toolbar))
        .route("/models/{name}/export-config", get(api::get_export_config))
        .route("/models/{name}/rules", get(api::get_rules))
        .route("/models/{name}/validate", post(api::validate_record))
        .route("/models/{name}/prepare", post(api::prepare_record));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
