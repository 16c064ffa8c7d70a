//! Report endpoints: JSON payloads and PDF downloads.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::reports::{self, ProductCatalog, ReportParams, ReportPayload, ReportType, pdf};
use crate::state::AppState;

/// Query parameters accepted by both report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Bucketing unit; defaults to daily.
    #[serde(rename = "type", default)]
    pub report_type: ReportType,
    /// Bucket count; defaults per type when omitted.
    pub periods: Option<u32>,
    /// Anchor year for yearly reports.
    pub year: Option<i32>,
}

/// `GET /api/reports` - build a report payload as JSON.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportPayload>, AppError> {
    let payload = generate(&state, &query).await?;
    Ok(Json(payload))
}

/// `GET /api/reports/download` - build a report and render it as a PDF
/// attachment.
pub async fn download_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let payload = generate(&state, &query).await?;
    let bytes = pdf::render(&payload, &state.config().depot_name)?;
    let filename = pdf::suggested_filename(&payload);

    tracing::info!(
        report_type = %payload.report_type,
        size_bytes = bytes.len(),
        %filename,
        "report document rendered"
    );

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Shared generation path: normalize parameters, load the product catalog,
/// and run the aggregation pipeline anchored at the current time.
async fn generate(state: &AppState, query: &ReportQuery) -> Result<ReportPayload, AppError> {
    let params = ReportParams::normalized(query.report_type, query.periods, query.year);

    tracing::debug!(
        report_type = %params.report_type,
        periods = params.periods,
        year = ?params.year,
        "generating report"
    );

    let catalog = ProductCatalog::new(db::products::list_all(state.pool()).await?);
    let payload = reports::build_report(state.pool(), &catalog, &params, Utc::now()).await?;
    Ok(payload)
}
