// Candidate analysis: backend proxy, local cache and report/CSV rendering.
// PDF rendering is CPU-bound and always runs inside tokio::task::spawn_blocking.

pub mod handlers;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::backend::BackendError;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::report::{generate_report, RenderedReport, ReportConfig};
use crate::state::AppState;
use crate::store::analysis_key;

/// Runs a fresh analysis and keeps a copy in the local store.
pub async fn run_analysis(
    state: &AppState,
    candidate_id: &str,
) -> Result<AnalysisResult, AppError> {
    let result = state.source.analyze(candidate_id).await?;
    state
        .store
        .set_async(&analysis_key(candidate_id), &result)
        .await?;
    info!(
        candidate_id,
        score = result.overall_score,
        job_matches = result.job_matches.len(),
        "analysis completed"
    );
    Ok(result)
}

/// Backend cache first, then the local store.
pub async fn load_analysis(
    state: &AppState,
    candidate_id: &str,
) -> Result<AnalysisResult, AppError> {
    if let Some(result) = state.source.cached_analysis(candidate_id).await? {
        return Ok(result);
    }
    state
        .store
        .get::<AnalysisResult>(&analysis_key(candidate_id))?
        .ok_or_else(|| AppError::NotFound(format!("No analysis for candidate {candidate_id}")))
}

/// Display name for file names and the identity panel.
///
/// An explicit name wins; otherwise the backend record is used. A candidate
/// the backend does not know yields an empty name.
pub async fn candidate_name(
    state: &AppState,
    candidate_id: &str,
    explicit: Option<&str>,
) -> Result<String, AppError> {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }
    match state.source.candidate(candidate_id).await {
        Ok(summary) => Ok(summary.name),
        Err(BackendError::NotFound(_)) => {
            warn!(candidate_id, "candidate record not found, rendering without a name");
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Renders the PDF on the blocking pool. A panic inside the renderer is
/// reported like any other rendering failure.
pub async fn render_pdf(
    config: Arc<ReportConfig>,
    candidate_id: String,
    candidate_name: String,
    result: AnalysisResult,
    date: NaiveDate,
) -> Result<RenderedReport, AppError> {
    let rendered = tokio::task::spawn_blocking(move || {
        generate_report(&candidate_id, &candidate_name, &result, &config, date)
    })
    .await
    .map_err(|e| AppError::Render(format!("render task failed: {e}")))??;

    info!(
        file_name = %rendered.file_name,
        pages = rendered.page_count,
        "report generated"
    );
    Ok(rendered)
}
