//! Wardview — self-hosted analytics dashboard for hospital
//! patient-encounter records.
//!
//! One CSV loads at startup into an immutable in-memory table; an axum
//! server derives chart figures from it on demand and persists
//! browser uploads under a namespaced directory.

pub mod api;
pub mod config;
pub mod dataset;
pub mod figure;
pub mod upload;
pub mod views;
