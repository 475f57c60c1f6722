//! File upload handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use listing::FileUpload;

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// POST /upload
///
/// Expects a multipart form with a `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileUpload>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Uploaded file has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let workbench = state.workbench.clone();
    let result = blocking(move || workbench.blocking_write().upload_file(&filename, &bytes)).await?;

    Ok(Json(result))
}
