use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardview";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Address the dashboard binds to. Localhost only; the app is single-user.
pub const BIND_ADDR: &str = "127.0.0.1:8050";

/// Log filter applied when RUST_LOG is unset.
pub const DEFAULT_LOG_FILTER: &str = "wardview=info,tower_http=warn";

/// Number of equal-width buckets in the billing distribution chart.
pub const BILLING_BUCKETS: usize = 10;

/// Get the bundled dataset path, relative to the working directory
pub fn dataset_path() -> PathBuf {
    PathBuf::from("assets").join("healthcare.csv")
}

/// Get the directory uploaded files are persisted to
pub fn uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}
