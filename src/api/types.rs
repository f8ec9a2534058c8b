//! Shared state for the dashboard API layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::dataset::Dataset;

/// Shared context for all API routes.
///
/// The record table is loaded once at startup and read-only afterward,
/// so request tasks share it behind an `Arc` with no locking. The
/// uploads directory is the only mutable resource; concurrent writes to
/// the same name race last-write-wins.
#[derive(Clone)]
pub struct ApiContext {
    pub dataset: Arc<Dataset>,
    pub uploads_dir: PathBuf,
}

impl ApiContext {
    pub fn new(dataset: Arc<Dataset>, uploads_dir: PathBuf) -> Self {
        Self {
            dataset,
            uploads_dir,
        }
    }
}
