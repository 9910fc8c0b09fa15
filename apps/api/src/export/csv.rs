//! Job-match table as CSV, one row per match in the order the backend ranked them.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::analysis::AnalysisResult;
use crate::report::file_stem;
use crate::report::locale::Labels;

pub const CSV_MIME: &str = "text/csv; charset=utf-8";

const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct JobMatchRecord<'a> {
    rank: usize,
    job_id: &'a str,
    job_title: &'a str,
    matched: Option<u32>,
    required: Option<u32>,
    compatibility_percent: i64,
    recommendation: &'static str,
    matching_skills: String,
    missing_skills: String,
}

fn join(list: Option<&Vec<String>>) -> String {
    list.map(|items| items.join(LIST_SEPARATOR)).unwrap_or_default()
}

pub fn job_matches_csv(result: &AnalysisResult, labels: &Labels) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    if result.job_matches.is_empty() {
        // serialize() writes headers lazily; keep them for an empty table.
        writer.write_record([
            "rank",
            "job_id",
            "job_title",
            "matched",
            "required",
            "compatibility_percent",
            "recommendation",
            "matching_skills",
            "missing_skills",
        ])?;
    }

    for (i, job) in result.job_matches.iter().enumerate() {
        writer.serialize(JobMatchRecord {
            rank: i + 1,
            job_id: &job.job_id,
            job_title: &job.job_title,
            matched: job.matched_skill_count,
            required: job.required_skill_count,
            compatibility_percent: job.compatibility_percent.round() as i64,
            recommendation: labels.recommendation(job.recommendation),
            matching_skills: join(job.matching_skills.as_ref()),
            missing_skills: join(job.missing_skills.as_ref()),
        })?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// `Coincidencias_<name>_<YYYY-MM-DD>.csv`.
pub fn job_matches_file_name(candidate_name: &str, date: NaiveDate) -> String {
    format!(
        "Coincidencias_{}_{}.csv",
        file_stem(candidate_name),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::fixtures::analysis;
    use crate::report::Locale;

    fn rows(bytes: &[u8]) -> Vec<::csv::StringRecord> {
        ::csv::Reader::from_reader(bytes)
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_one_row_per_match() {
        let result = analysis();
        let bytes = job_matches_csv(&result, Locale::Es.labels()).unwrap();
        let records = rows(&bytes);
        assert_eq!(records.len(), result.job_matches.len());
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][2], "Backend Engineer");
        assert_eq!(&records[0][5], "92");
        assert_eq!(&records[0][6], "Recomendado");
        assert_eq!(&records[0][7], "Rust; SQL");
    }

    #[test]
    fn test_header_row_present_for_empty_table() {
        let mut result = analysis();
        result.job_matches.clear();
        let bytes = job_matches_csv(&result, Locale::En.labels()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("rank,job_id,job_title"));
        assert!(rows(text.as_bytes()).is_empty());
    }

    #[test]
    fn test_missing_counts_are_blank() {
        let mut result = analysis();
        result.job_matches[1].matched_skill_count = None;
        result.job_matches[1].required_skill_count = None;
        let records = rows(&job_matches_csv(&result, Locale::En.labels()).unwrap());
        assert_eq!(&records[1][3], "");
        assert_eq!(&records[1][4], "");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            job_matches_file_name("Ana María", date),
            "Coincidencias_Ana_María_2026-10-16.csv"
        );
    }
}
