//! Chart endpoints — one route per derived view.
//!
//! Each handler reads its control values from the query string, runs
//! the matching view builder over the shared record table, and returns
//! a Plotly figure specification. An absent or empty `gender` /
//! `condition` parameter means "no selection".

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::figure::{self, ChartKind, Figure};
use crate::views;

/// Empty-string selections come from the dropdowns' "All" option.
fn selection(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
pub struct GenderQuery {
    pub gender: Option<String>,
}

/// `GET /api/charts/age-distribution?gender=`
pub async fn age_distribution(
    State(ctx): State<ApiContext>,
    Query(query): Query<GenderQuery>,
) -> Result<Json<Figure>, ApiError> {
    let view = views::age_by_gender(&ctx.dataset, selection(&query.gender));
    Ok(Json(figure::age_histogram(&view)))
}

/// `GET /api/charts/condition-share?gender=`
pub async fn condition_share(
    State(ctx): State<ApiContext>,
    Query(query): Query<GenderQuery>,
) -> Result<Json<Figure>, ApiError> {
    let view = views::condition_share(&ctx.dataset, selection(&query.gender));
    Ok(Json(figure::condition_pie(&view)))
}

/// `GET /api/charts/insurance-billing?gender=`
pub async fn insurance_billing(
    State(ctx): State<ApiContext>,
    Query(query): Query<GenderQuery>,
) -> Result<Json<Figure>, ApiError> {
    let view = views::insurance_billing(&ctx.dataset, selection(&query.gender));
    Ok(Json(figure::insurance_bars(&view)))
}

#[derive(Deserialize)]
pub struct BillingQuery {
    pub gender: Option<String>,
    pub ceiling: Option<String>,
}

/// `GET /api/charts/billing-distribution?gender=&ceiling=`
///
/// An absent ceiling defaults to the dataset median, matching the
/// slider's initial position.
pub async fn billing_distribution(
    State(ctx): State<ApiContext>,
    Query(query): Query<BillingQuery>,
) -> Result<Json<Figure>, ApiError> {
    let ceiling = match selection(&query.ceiling) {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid ceiling '{raw}'")))?,
        None => ctx.dataset.billing_stats().median,
    };

    let view = views::billing_distribution(&ctx.dataset, selection(&query.gender), ceiling);
    Ok(Json(figure::billing_histogram(&view)))
}

#[derive(Deserialize)]
pub struct TrendsQuery {
    pub condition: Option<String>,
    pub kind: Option<String>,
}

/// `GET /api/charts/admission-trends?condition=&kind=`
pub async fn admission_trends(
    State(ctx): State<ApiContext>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Figure>, ApiError> {
    let kind = match selection(&query.kind) {
        Some(raw) => raw
            .parse::<ChartKind>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => ChartKind::default(),
    };

    let view = views::admission_trends(&ctx.dataset, selection(&query.condition));
    Ok(Json(figure::trends_chart(&view, kind)))
}
