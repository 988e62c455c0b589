// ============================================================
// Layer 1b — HTTP API
// ============================================================
// A thin axum shim over ScoreUseCase.
//
//   GET /scores?year=1946&metric=polarity
//       200 {"AFG": 0.1, "ALB": null, ...}
//       400 {"error": "..."}            bad year or unknown metric
//       404 {"error": "Folder not found"}
//   GET /health
//       200 {"status": "ok", ...}
//
// `year` defaults to 1946 and `metric` to polarity.
//
// Scoring reads files and may run the classifier, so handlers
// move it onto tokio's blocking pool instead of stalling the
// async workers.
//
// Reference: axum 0.7 documentation (Router, extractors)
//            Rust Book §16 (Fearless Concurrency)

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::score_use_case::{ScoreError, ScoreUseCase, Scores};
use crate::domain::metric::MetricKind;

const DEFAULT_YEAR: &str = "1946";
const DEFAULT_METRIC: MetricKind = MetricKind::SentimentPolarity;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub scores: Arc<ScoreUseCase>,
}

impl AppState {
    pub fn new(scores: ScoreUseCase) -> Self {
        Self { scores: Arc::new(scores) }
    }
}

/// Raw query string; both fields are validated by the handler so
/// bad input gets a JSON 400 instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ScoreQuery {
    pub year:   Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status:  String,
    pub version: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(String),
}

impl From<ScoreError> for ApiError {
    fn from(e: ScoreError) -> Self {
        match e {
            ScoreError::FolderNotFound { .. } => ApiError::NotFound,
            ScoreError::Corpus(e) => ApiError::Internal(format!("{e:#}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound        => (StatusCode::NOT_FOUND, "Folder not found".to_string()),
            ApiError::Internal(msg)   => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// GET /scores
pub async fn get_scores(
    State(state): State<AppState>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<Scores>, ApiError> {
    let year_text = query.year.as_deref().unwrap_or(DEFAULT_YEAR).trim();
    let year: i32 = year_text
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid year '{}'", year_text)))?;

    let metric = match query.metric.as_deref() {
        None => DEFAULT_METRIC,
        Some(m) => m
            .parse::<MetricKind>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    tracing::debug!("GET /scores year={} metric={}", year, metric);

    let use_case = Arc::clone(&state.scores);
    let scores = tokio::task::spawn_blocking(move || use_case.scores(year, metric))
        .await
        .map_err(|e| ApiError::Internal(format!("scoring task failed: {e}")))??;

    Ok(Json(scores))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/scores", get(get_scores))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use serde_json::Value;
    use tower::util::ServiceExt; // for `oneshot` method

    use crate::data::loader::SessionFolderSource;
    use crate::data::preprocessor::Normalizer;
    use crate::metrics::MetricEngine;
    use crate::test_support::CorpusBuilder;

    fn setup_app(root: &std::path::Path) -> Router {
        let use_case = ScoreUseCase::new(
            Arc::new(SessionFolderSource::new(root)),
            Arc::new(MetricEngine::default()),
            Normalizer::default(),
        );
        build_router(AppState::new(use_case))
    }

    fn test_request(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    async fn extract_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn corpus() -> tempfile::TempDir {
        CorpusBuilder::new()
            .document(1946, "AFG_01_1946.txt", "1. The war is bad.\n2. It harms people.")
            .document(1946, "ALB_01_1946.txt", "4. ")
            .document(1950, "FRA_05_1950.txt", "Bonjour mes amis.")
            .build()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = corpus();
        let response = setup_app(dir.path()).oneshot(test_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_scores_with_defaults() {
        let dir = corpus();
        let response = setup_app(dir.path()).oneshot(test_request("/scores")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = extract_json(response.into_body()).await;
        assert!(body["AFG"].as_f64().unwrap() < 0.0);
        assert!(body["ALB"].is_null());
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scores_for_year_and_metric() {
        let dir = corpus();
        let response = setup_app(dir.path())
            .oneshot(test_request("/scores?year=1950&metric=token-count"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["FRA"], 3.0);
    }

    #[tokio::test]
    async fn test_missing_folder_is_404() {
        let dir = corpus();
        let response = setup_app(dir.path())
            .oneshot(test_request("/scores?year=1999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"], "Folder not found");
    }

    #[tokio::test]
    async fn test_extreme_year_is_404() {
        let dir = corpus();
        let response = setup_app(dir.path())
            .oneshot(test_request("/scores?year=-2147483648"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_input_is_400() {
        let dir = corpus();
        for uri in ["/scores?year=nineteen", "/scores?metric=vibes"] {
            let response = setup_app(dir.path()).oneshot(test_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = extract_json(response.into_body()).await;
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_fake_likelihood_without_model_is_null() {
        let dir = corpus();
        let response = setup_app(dir.path())
            .oneshot(test_request("/scores?metric=fake-likelihood"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert!(body["AFG"].is_null());
    }
}
