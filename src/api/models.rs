//! Model metadata endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{success, ApiResult};
use crate::forms::{generate_form_config, generate_layout, FormConfig, FormLayout};
use crate::grid::{
    generate_columns, generate_export_config, generate_grid, generate_toolbar, ExportConfig,
    GridColumn, GridConfig, Toolbar,
};
use crate::models::{ModelDescriptor, Record};
use crate::registry::NavigationEntry;
use crate::validation::{generate_rules, validate_model, FieldErrors, ValidationRule};
use crate::errors::AppError;
use crate::AppState;

/// Result of validating a record against a model.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: FieldErrors,
}

fn resolve(state: &AppState, name: &str) -> Result<Arc<ModelDescriptor>, AppError> {
    state.registry.resolve(name).map(Arc::clone)
}

/// GET /api/models - Navigation entries for every registered model.
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Vec<NavigationEntry>> {
    success(state.registry.navigation())
}

/// GET /api/models/{name} - Model descriptor by name or navigation slug.
pub async fn get_model(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ModelDescriptor> {
    let model = resolve(&state, &name)?;
    success(ModelDescriptor::clone(&model))
}

/// GET /api/models/{name}/form
pub async fn get_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<FormConfig> {
    let model = resolve(&state, &name)?;
    success(generate_form_config(&model))
}

/// GET /api/models/{name}/form/layout
pub async fn get_form_layout(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<FormLayout> {
    let model = resolve(&state, &name)?;
    success(generate_layout(&generate_form_config(&model)))
}

/// GET /api/models/{name}/grid - Columns, toolbar and the configured page size.
pub async fn get_grid(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<GridConfig> {
    let model = resolve(&state, &name)?;
    success(generate_grid(&model).page_size(state.config.page_size))
}

/// GET /api/models/{name}/columns
pub async fn get_columns(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<GridColumn>> {
    let model = resolve(&state, &name)?;
    success(generate_columns(&model))
}

/// GET /api/models/{name}/toolbar
pub async fn get_toolbar(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Toolbar> {
    let model = resolve(&state, &name)?;
    success(generate_toolbar(model.model_name()))
}

/// GET /api/models/{name}/export-config
pub async fn get_export_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ExportConfig> {
    let model = resolve(&state, &name)?;
    success(generate_export_config(&model))
}

/// GET /api/models/{name}/rules
pub async fn get_rules(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<BTreeMap<String, Vec<ValidationRule>>> {
    let model = resolve(&state, &name)?;
    success(generate_rules(&model))
}

/// POST /api/models/{name}/validate - Field errors for a record. An
/// invalid record is a successful response with `valid: false`.
pub async fn validate_record(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(record): Json<Record>,
) -> ApiResult<ValidationReport> {
    let model = resolve(&state, &name)?;
    let errors = validate_model(&record, &model);
    tracing::debug!("Validated {} record: {} errors", model.model_name(), errors.len());
    success(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}

/// POST /api/models/{name}/prepare - The payload a write would send.
pub async fn prepare_record(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(record): Json<Record>,
) -> ApiResult<Record> {
    let model = resolve(&state, &name)?;
    success(model.prepare_for_backend(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::catalog::default_registry;
    use crate::config::Config;
    use crate::create_router;

    fn app() -> axum::Router {
        create_router(AppState {
            registry: Arc::new(default_registry().unwrap()),
            config: Arc::new(Config::default()),
        })
    }

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_toolbar_for_model() {
        let request = Request::get("/api/models/Arco/toolbar")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["text"], "Agregar Arco");
    }

    #[tokio::test]
    async fn test_grid_carries_configured_page_size() {
        let app = create_router(AppState {
            registry: Arc::new(default_registry().unwrap()),
            config: Arc::new(Config {
                page_size: 50,
                ..Config::default()
            }),
        });
        let request = Request::get("/api/models/Obra/grid")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["data"]["pageSize"], 50);
    }

    #[tokio::test]
    async fn test_validate_usuario_mac_address_length() {
        let request = Request::post("/api/models/Usuario/validate")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "nombre": "Ana", "direccion_mac_pc": "AA:BB:CC:DD:EE:FF:00" }).to_string(),
            ))
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["valid"], false);
        assert!(body["data"]["errors"].get("direccion_mac_pc").is_some());
    }

    #[tokio::test]
    async fn test_malformed_record_is_rejected() {
        let request = Request::post("/api/models/Obra/prepare")
            .header("content-type", "application/json")
            .body(Body::from("[1, 2]"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
    }
}
