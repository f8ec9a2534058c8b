//! Control metadata endpoint.
//!
//! The page calls this once on load to populate the gender and
//! condition dropdowns and to seed the billing ceiling slider.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dataset::BillingStats;

#[derive(Serialize)]
pub struct MetaResponse {
    pub genders: Vec<String>,
    pub conditions: Vec<String>,
    pub billing: BillingStats,
    pub rows: usize,
}

/// `GET /api/meta` — distinct control values and billing summary.
pub async fn describe(State(ctx): State<ApiContext>) -> Result<Json<MetaResponse>, ApiError> {
    Ok(Json(MetaResponse {
        genders: ctx.dataset.genders(),
        conditions: ctx.dataset.conditions(),
        billing: ctx.dataset.billing_stats(),
        rows: ctx.dataset.len(),
    }))
}
