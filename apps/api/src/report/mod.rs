// Candidate analysis report: layout engine and PDF writer.
// Rendering is synchronous and CPU-bound; callers in async code must run it
// inside tokio::task::spawn_blocking.

pub mod document;
pub mod font_metrics;
pub mod footer;
pub mod layout;
pub mod locale;
pub mod pdf;
pub mod sections;
pub mod table;
pub mod tier;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::models::analysis::AnalysisResult;

pub use document::{Document, PageGeometry};
pub use locale::Locale;

pub const PDF_MIME: &str = "application/pdf";

const DEFAULT_ORGANIZATION: &str = "Portal de Reclutamiento";
const FALLBACK_NAME: &str = "Candidato";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed analysis: {0}")]
    MalformedInput(String),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error while writing PDF: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub organization: String,
    pub locale: Locale,
    pub geometry: PageGeometry,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            locale: Locale::default(),
            geometry: PageGeometry::a4(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
}

/// Validates the analysis and lays out every page, footers included.
pub fn build_document(
    candidate_id: &str,
    candidate_name: &str,
    result: &AnalysisResult,
    config: &ReportConfig,
    date: NaiveDate,
) -> Result<Document, ReportError> {
    result.validate()?;

    let labels = config.locale.labels();
    let input = sections::ReportInput {
        candidate_id,
        candidate_name,
        result,
        organization: &config.organization,
        labels,
        date,
    };
    let mut pages = sections::layout_content(&input, config.geometry);
    footer::stamp_footers(&mut pages, &config.geometry, &config.organization, labels);

    Ok(Document {
        geometry: config.geometry,
        pages,
    })
}

/// Renders the full report. Output depends only on the arguments, so the
/// same input and date always yield the same bytes.
pub fn generate_report(
    candidate_id: &str,
    candidate_name: &str,
    result: &AnalysisResult,
    config: &ReportConfig,
    date: NaiveDate,
) -> Result<RenderedReport, ReportError> {
    let document = build_document(candidate_id, candidate_name, result, config, date)?;
    let labels = config.locale.labels();
    let title = format!("{} - {}", labels.report_title, candidate_name.trim());
    let bytes = pdf::write_pdf(
        &document,
        &pdf::PdfMetadata {
            title: &title,
            author: &config.organization,
            date,
        },
    )?;

    debug!(
        candidate_id,
        pages = document.page_count(),
        bytes = bytes.len(),
        "report rendered"
    );

    Ok(RenderedReport {
        bytes,
        file_name: report_file_name(candidate_name, date),
        page_count: document.page_count(),
    })
}

/// `Evaluacion_<name>_<YYYY-MM-DD>.pdf`.
pub fn report_file_name(candidate_name: &str, date: NaiveDate) -> String {
    format!("Evaluacion_{}_{}.pdf", file_stem(candidate_name), date.format("%Y-%m-%d"))
}

/// Candidate name made safe for a file name: whitespace runs become a single
/// `_` and path/reserved characters are replaced.
pub fn file_stem(candidate_name: &str) -> String {
    let joined = candidate_name.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}
