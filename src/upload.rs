//! Upload sink — decodes a browser-supplied blob and persists it under
//! the namespaced uploads directory.
//!
//! The client names the file, so the name is validated before it ever
//! touches the filesystem: no path separators, no `..`, no NUL, length
//! capped. Duplicate names keep last-write-wins semantics.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;

/// Longest stored filename, in characters.
const MAX_FILENAME_CHARS: usize = 120;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsafe filename: {0}")]
    UnsafeFilename(String),
    #[error("invalid upload payload: {0}")]
    InvalidPayload(String),
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Receipt for a persisted upload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SavedUpload {
    pub stored_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Decode a Dash-style data URL (`data:<mime>;base64,<payload>`) or a
/// bare base64 string into raw bytes.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, UploadError> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(base64_data.trim())
        .map_err(|e| UploadError::InvalidPayload(format!("base64 decode failed: {e}")))
}

/// Validate and normalize a client-supplied filename.
///
/// Rejects path separators, NUL, `.`/`..`, and names empty after
/// trimming. Remaining characters outside [alphanumeric . - _ space]
/// normalize to `_`; the result caps at `MAX_FILENAME_CHARS`.
pub fn sanitize_filename(original: &str) -> Result<String, UploadError> {
    let trimmed = original.trim();
    if trimmed.is_empty() {
        return Err(UploadError::UnsafeFilename("empty filename".into()));
    }
    if trimmed.contains(['/', '\\', '\0']) {
        return Err(UploadError::UnsafeFilename(format!(
            "'{trimmed}' contains a path separator or NUL"
        )));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(UploadError::UnsafeFilename(format!(
            "'{trimmed}' is a path component"
        )));
    }

    let clean: String = trimmed
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_CHARS)
        .collect();

    Ok(clean)
}

/// Write the blob to `dir` under the sanitized filename, creating the
/// directory on demand. An existing file with the same name is silently
/// overwritten.
pub fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<SavedUpload, UploadError> {
    let stored_name = sanitize_filename(filename)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(&stored_name);
    fs::write(&path, bytes)?;

    tracing::info!(
        name = %stored_name,
        size_bytes = bytes.len(),
        "upload stored"
    );

    Ok(SavedUpload {
        stored_name,
        path,
        size_bytes: bytes.len() as u64,
    })
}
