use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::analysis::{candidate_name, load_analysis, render_pdf, run_analysis};
use crate::errors::AppError;
use crate::export::{job_matches_csv, job_matches_file_name, CSV_MIME};
use crate::models::analysis::AnalysisResult;
use crate::report::PDF_MIME;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub candidate_id: String,
    #[serde(default)]
    pub candidate_name: String,
    pub result: AnalysisResult,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `attachment` disposition with an ASCII fallback and the RFC 5987 UTF-8 name.
pub fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

fn download(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(file_name)),
        ],
        bytes,
    )
        .into_response()
}

/// POST /api/v1/candidates/:id/analysis
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(run_analysis(&state, &id).await?))
}

/// GET /api/v1/candidates/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(load_analysis(&state, &id).await?))
}

/// GET /api/v1/candidates/:id/analysis/report.pdf
pub async fn handle_report_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NameQuery>,
) -> Result<Response, AppError> {
    let result = load_analysis(&state, &id).await?;
    let name = candidate_name(&state, &id, query.name.as_deref()).await?;
    let rendered = render_pdf(state.report.clone(), id, name, result, today()).await?;
    Ok(download(PDF_MIME, &rendered.file_name, rendered.bytes))
}

/// GET /api/v1/candidates/:id/analysis/job-matches.csv
pub async fn handle_job_matches_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NameQuery>,
) -> Result<Response, AppError> {
    let result = load_analysis(&state, &id).await?;
    let name = candidate_name(&state, &id, query.name.as_deref()).await?;
    let bytes = job_matches_csv(&result, state.report.locale.labels())?;
    Ok(download(
        CSV_MIME,
        &job_matches_file_name(&name, today()),
        bytes,
    ))
}

/// POST /api/v1/reports/analysis
/// Renders a supplied result without any backend round-trip.
pub async fn handle_render_report(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Response, AppError> {
    if req.candidate_id.trim().is_empty() {
        return Err(AppError::Validation("candidateId must not be empty".to_string()));
    }
    let rendered = render_pdf(
        state.report.clone(),
        req.candidate_id,
        req.candidate_name,
        req.result,
        today(),
    )
    .await?;
    Ok(download(PDF_MIME, &rendered.file_name, rendered.bytes))
}
