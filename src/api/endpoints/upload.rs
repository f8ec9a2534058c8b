//! File upload endpoint.
//!
//! Accepts the Dash-style JSON body the page posts: a filename plus a
//! base64 data URL, with `contents: null` meaning nothing was picked.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::upload;

#[derive(Deserialize)]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub contents: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub stored_name: Option<String>,
    pub size_bytes: Option<u64>,
}

/// `POST /api/upload` — persist an uploaded blob under `uploads/`.
pub async fn accept(
    State(ctx): State<ApiContext>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Some(contents) = request.contents else {
        // No file picked; no filesystem I/O.
        return Ok(Json(UploadResponse {
            status: "Nothing uploaded yet.".into(),
            stored_name: None,
            size_bytes: None,
        }));
    };

    let filename = request
        .filename
        .ok_or_else(|| ApiError::BadRequest("filename is required".into()))?;

    let bytes = upload::decode_data_url(&contents)?;
    let saved = upload::save_upload(&ctx.uploads_dir, &filename, &bytes)?;

    Ok(Json(UploadResponse {
        status: format!("Saved '{}' ({} bytes).", saved.stored_name, saved.size_bytes),
        stored_name: Some(saved.stored_name),
        size_bytes: Some(saved.size_bytes),
    }))
}
