pub mod health;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route(
            "/api/v1/session/token",
            put(session::handle_set_token).delete(session::handle_clear_token),
        )
        // Candidate analysis
        .route(
            "/api/v1/candidates/:id/analysis",
            get(handlers::handle_get_analysis).post(handlers::handle_run_analysis),
        )
        .route(
            "/api/v1/candidates/:id/analysis/report.pdf",
            get(handlers::handle_report_pdf),
        )
        .route(
            "/api/v1/candidates/:id/analysis/job-matches.csv",
            get(handlers::handle_job_matches_csv),
        )
        // Reports
        .route(
            "/api/v1/reports/analysis",
            post(handlers::handle_render_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::backend::{AnalysisSource, BackendError};
    use crate::errors::RENDER_FAILED;
    use crate::models::analysis::fixtures::analysis;
    use crate::models::analysis::AnalysisResult;
    use crate::models::candidate::CandidateSummary;
    use crate::report::{ReportConfig, PDF_MIME};
    use crate::store::{KeyValueStore, TOKEN_KEY};

    /// Knows candidate "42"; "401" is rejected; everything else is unknown.
    struct FakeSource;

    #[async_trait]
    impl AnalysisSource for FakeSource {
        async fn analyze(&self, candidate_id: &str) -> Result<AnalysisResult, BackendError> {
            match candidate_id {
                "401" => Err(BackendError::Unauthorized),
                "down" => Err(BackendError::Api {
                    status: 503,
                    message: "scoring engine offline".to_string(),
                }),
                _ => Ok(analysis()),
            }
        }

        async fn cached_analysis(
            &self,
            candidate_id: &str,
        ) -> Result<Option<AnalysisResult>, BackendError> {
            Ok((candidate_id == "42").then(analysis))
        }

        async fn candidate(&self, candidate_id: &str) -> Result<CandidateSummary, BackendError> {
            match candidate_id {
                "42" => Ok(CandidateSummary {
                    id: "42".to_string(),
                    name: "Ana María Pérez".to_string(),
                }),
                other => Err(BackendError::NotFound(format!("candidate {other}"))),
            }
        }
    }

    fn app() -> (Router, Arc<KeyValueStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KeyValueStore::open(dir.path().join("store.json")).unwrap());
        let state = AppState {
            source: Arc::new(FakeSource),
            store: store.clone(),
            report: Arc::new(ReportConfig::default()),
        };
        (build_router(state), store, dir)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _dir) = app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_report_pdf_download() {
        let (app, _, _dir) = app();
        let response = app
            .oneshot(
                Request::get("/api/v1/candidates/42/analysis/report.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PDF_MIME);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"Evaluacion_Ana_Mar"));
        assert!(disposition.contains("filename*=UTF-8''Evaluacion_Ana_Mar%C3%ADa_P%C3%A9rez_"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_missing_analysis_is_not_found() {
        let (app, _, _dir) = app();
        let response = app
            .oneshot(
                Request::get("/api/v1/candidates/7/analysis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_run_analysis_caches_locally() {
        let (app, store, _dir) = app();
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/candidates/7/analysis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(store
            .get::<AnalysisResult>("analysis:7")
            .unwrap()
            .is_some());

        // Served from the local store now that the backend has nothing cached.
        let response = app
            .oneshot(
                Request::get("/api/v1/candidates/7/analysis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["overallScore"], 85.0);
    }

    #[tokio::test]
    async fn test_backend_failures_map_to_status_codes() {
        let (app, _, _dir) = app();
        let unauthorized = app
            .clone()
            .oneshot(
                Request::post("/api/v1/candidates/401/analysis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let down = app
            .oneshot(
                Request::post("/api/v1/candidates/down/analysis")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(down.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(down).await["error"]["message"],
            "scoring engine offline"
        );
    }

    #[tokio::test]
    async fn test_render_supplied_result() {
        let (app, _, _dir) = app();
        let body = json!({
            "candidateId": "99",
            "candidateName": "Luis Gómez",
            "result": analysis(),
        });
        let response = app
            .oneshot(
                Request::post("/api/v1/reports/analysis")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PDF_MIME);
    }

    #[tokio::test]
    async fn test_render_failure_returns_generic_message() {
        let (app, _, _dir) = app();
        let mut result = analysis();
        result.overall_score = 250.0;
        let body = json!({"candidateId": "99", "candidateName": "X", "result": result});
        let response = app
            .oneshot(
                Request::post("/api/v1/reports/analysis")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["message"], RENDER_FAILED);
    }

    #[tokio::test]
    async fn test_job_matches_csv_download() {
        let (app, _, _dir) = app();
        let response = app
            .oneshot(
                Request::get("/api/v1/candidates/42/analysis/job-matches.csv?name=Ana")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("Coincidencias_Ana_"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_token_set_and_clear() {
        let (app, store, _dir) = app();
        let response = app
            .clone()
            .oneshot(
                Request::put("/api/v1/session/token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"token":"abc"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        let response = app
            .oneshot(
                Request::delete("/api/v1/session/token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let (app, _, _dir) = app();
        let response = app
            .oneshot(
                Request::put("/api/v1/session/token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"token":"  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
