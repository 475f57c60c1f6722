//! Marketplace template handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use listing::{AttributeSchema, Page, TemplateRecord};
use serde::Deserialize;

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for creating a template.
#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    /// Attribute name -> rule object; validated into an [`AttributeSchema`].
    pub attributes_schema: serde_json::Value,
}

/// POST /templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateRecord>), ApiError> {
    let schema = AttributeSchema::from_value(req.attributes_schema)?;

    let workbench = state.workbench.clone();
    let template =
        blocking(move || workbench.blocking_write().create_template(&req.name, schema)).await?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /templates?skip&limit
pub async fn list_templates(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Json<Vec<TemplateRecord>> {
    let workbench = state.workbench.read().await;
    Json(workbench.list_templates(page))
}

/// GET /templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TemplateRecord>, ApiError> {
    let workbench = state.workbench.read().await;
    Ok(Json(workbench.get_template(id)?))
}
