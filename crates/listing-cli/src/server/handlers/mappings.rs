//! Column mapping and validation handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use listing::{MappingRecord, MappingRules, Page, ValidationResponse};
use serde::Deserialize;

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for creating a mapping.
#[derive(Deserialize)]
pub struct CreateMappingRequest {
    pub template_id: u64,
    pub file_id: u64,
    /// Attribute name -> source column header.
    pub mapping_rules: MappingRules,
}

/// POST /mappings
pub async fn create_mapping(
    State(state): State<AppState>,
    Json(req): Json<CreateMappingRequest>,
) -> Result<(StatusCode, Json<MappingRecord>), ApiError> {
    let workbench = state.workbench.clone();
    let mapping = blocking(move || {
        workbench
            .blocking_write()
            .create_mapping(req.template_id, req.file_id, req.mapping_rules)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(mapping)))
}

/// GET /mappings?skip&limit
pub async fn list_mappings(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Json<Vec<MappingRecord>> {
    let workbench = state.workbench.read().await;
    Json(workbench.list_mappings(page))
}

/// GET /mappings/:id
pub async fn get_mapping(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MappingRecord>, ApiError> {
    let workbench = state.workbench.read().await;
    Ok(Json(workbench.get_mapping(id)?))
}

/// GET /mappings/:id/validate
pub async fn validate_mapping(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ValidationResponse>, ApiError> {
    // Resolve under the read lock, then parse and validate without it
    let job = state.workbench.read().await.prepare_validation(id)?;
    let response = blocking(move || job.run()).await?;

    Ok(Json(response))
}
