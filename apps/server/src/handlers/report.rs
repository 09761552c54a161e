//! # Report Handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use kasir_core::validation::validate_report_date;
use kasir_core::Report;

/// Query parameters of `GET /report`.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
pub async fn range_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Report>, ApiError> {
    let start = params
        .start_date
        .as_deref()
        .ok_or_else(|| ApiError::validation("start_date is required"))?;
    let end = params
        .end_date
        .as_deref()
        .ok_or_else(|| ApiError::validation("end_date is required"))?;

    let start = validate_report_date("start_date", start)?;
    let end = validate_report_date("end_date", end)?;

    debug!(start = %start, end = %end, "range_report");

    let report = state.db.reports().range(start, end).await?;
    Ok(Json(report))
}

/// `GET /report/today`
pub async fn today_report(State(state): State<AppState>) -> Result<Json<Report>, ApiError> {
    debug!("today_report");

    let report = state.db.reports().today().await?;
    Ok(Json(report))
}
