/// Backend client: the single point of entry for calls to the recruitment REST API.
///
/// Responses use the `{ success, data, message }` envelope. Requests carry the
/// bearer token kept in the development key/value store, when one is set.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::AnalysisResult;
use crate::models::candidate::{CandidateRecord, CandidateSummary};
use crate::store::{KeyValueStore, StoreError, TOKEN_KEY};

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the credentials")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("backend reported failure: {0}")]
    Rejected(String),

    #[error("backend returned no data for {0}")]
    EmptyData(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token store error: {0}")]
    Store(#[from] StoreError),
}

/// Where analyses and candidate records come from. The HTTP client is the
/// production implementation; tests plug in fakes.
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Runs a fresh AI analysis for the candidate.
    async fn analyze(&self, candidate_id: &str) -> Result<AnalysisResult, BackendError>;

    /// Last analysis the backend has on file, if any.
    async fn cached_analysis(
        &self,
        candidate_id: &str,
    ) -> Result<Option<AnalysisResult>, BackendError>;

    async fn candidate(&self, candidate_id: &str) -> Result<CandidateSummary, BackendError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Best-effort human message out of an error body.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected backend response")
                .to_string()
        })
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    store: Arc<KeyValueStore>,
    retry_base: Duration,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<KeyValueStore>,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            retry_base: DEFAULT_RETRY_BASE,
        })
    }

    /// Overrides the first backoff delay; later delays double it.
    #[cfg(test)]
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    fn candidate_url(&self, candidate_id: &str, suffix: &str) -> String {
        format!(
            "{}/admin/candidates/{}{}",
            self.base_url,
            urlencoding::encode(candidate_id),
            suffix
        )
    }

    /// Sends one logical request, retrying on 429 and 5xx.
    ///
    /// Returns `Ok(None)` for a 404 or an envelope whose `data` is null.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
    ) -> Result<Option<T>, BackendError> {
        let token: Option<String> = self.store.get(TOKEN_KEY)?;
        let mut last_error: Option<BackendError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 1s, 2s with the default base
                let delay = self.retry_base * (1 << (attempt - 1));
                warn!(
                    %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "backend call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            let mut builder = self.client.request(method.clone(), url);
            if let Some(token) = &token {
                builder = builder.bearer_auth(token);
            }

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = Some(BackendError::Http(e));
                    continue;
                }
                Err(e) => return Err(BackendError::Http(e)),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(BackendError::Api {
                    status: status.as_u16(),
                    message: error_message(&body, status),
                });
                continue;
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(BackendError::Unauthorized);
            }

            if status == StatusCode::NOT_FOUND {
                debug!(%url, "backend returned 404");
                return Ok(None);
            }

            let body = response.text().await?;
            if !status.is_success() {
                return Err(BackendError::Api {
                    status: status.as_u16(),
                    message: error_message(&body, status),
                });
            }

            let envelope: Envelope<T> = serde_json::from_str(&body)?;
            if !envelope.success {
                return Err(BackendError::Rejected(
                    envelope
                        .message
                        .unwrap_or_else(|| "request was not successful".to_string()),
                ));
            }

            debug!(%url, attempt, "backend call succeeded");
            return Ok(envelope.data);
        }

        Err(last_error.unwrap_or_else(|| BackendError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            message: "backend unavailable".to_string(),
        }))
    }
}

#[async_trait]
impl AnalysisSource for BackendClient {
    async fn analyze(&self, candidate_id: &str) -> Result<AnalysisResult, BackendError> {
        let url = self.candidate_url(candidate_id, "/ai-analyze");
        self.request(Method::POST, &url)
            .await?
            .ok_or_else(|| BackendError::EmptyData(format!("analysis of candidate {candidate_id}")))
    }

    async fn cached_analysis(
        &self,
        candidate_id: &str,
    ) -> Result<Option<AnalysisResult>, BackendError> {
        let url = self.candidate_url(candidate_id, "/ai-analysis");
        self.request(Method::GET, &url).await
    }

    async fn candidate(&self, candidate_id: &str) -> Result<CandidateSummary, BackendError> {
        let url = self.candidate_url(candidate_id, "");
        let record: CandidateRecord = self
            .request(Method::GET, &url)
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("candidate {candidate_id}")))?;
        Ok(record.into_summary(candidate_id))
    }
}
