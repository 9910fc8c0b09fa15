use std::sync::Arc;

use crate::backend::AnalysisSource;
use crate::report::ReportConfig;
use crate::store::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backend access. Default: `BackendClient`; tests swap in a fake.
    pub source: Arc<dyn AnalysisSource>,
    /// Development key/value shim holding the bearer token and cached analyses.
    pub store: Arc<KeyValueStore>,
    pub report: Arc<ReportConfig>,
}
