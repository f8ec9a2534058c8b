//! Dashboard API endpoint handlers.

pub mod charts;
pub mod health;
pub mod meta;
pub mod upload;
