// Tabular exports of an analysis.

pub mod csv;

pub use self::csv::{job_matches_csv, job_matches_file_name, ExportError, CSV_MIME};
