//! HTTP transport module for the sdg-insights service
//!
//! Axum router exposing PDF upload and goal-insight extraction under /nlp.
//! Health, info, and metrics are plain JSON.

use crate::annotate::clean;
use crate::catalog::GOAL_COUNT;
use crate::config::Config;
use crate::error::{InsightError, Result};
use crate::insight::{InsightEngine, to_json_map};
use crate::pdf;
use axum::{
    Router,
    body::Body,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, Multipart, Path as UrlPath, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::{cmp::Ordering, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower::{BoxError, ServiceBuilder, timeout::TimeoutLayer};
use tower_http::cors::{Any, CorsLayer};

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub engine: Arc<InsightEngine>,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub uploads_total: u64,
    pub extractions_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: std::time::SystemTime::UNIX_EPOCH
                .elapsed()
                .unwrap_or_default()
                .as_secs(),
            errors_total: 0,
            uploads_total: 0,
            extractions_total: 0,
            latencies: Vec::with_capacity(256),
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let system = &state.config.system;
    let pipeline = &state.config.pipeline;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "annotator": {
                "provider": state.engine.annotator_name(),
                "url": system.annotator_url,
            },
            "catalog": {
                "goals": GOAL_COUNT,
            },
            "pipeline": {
                "window_span": pipeline.window_span,
                "summary_sentences": pipeline.summary_sentences,
                "max_sentence_tokens": pipeline.max_sentence_tokens,
                "carry_over_sentences": pipeline.carry_over_sentences,
            },
            "server": {
                "bind": state.config.runtime.http_bind.to_string(),
                "upload_dir": system.upload_dir,
            }
        })
        .to_string(),
    )
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "uploads_total": metrics.uploads_total,
            "extractions_total": metrics.extractions_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms
        })
        .to_string(),
    )
}

/// Accept a single PDF via multipart form data and store it for extraction
pub async fn upload_handler(
    State(state): State<HttpState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) =
        multipart
            .next_field()
            .await
            .map_err(|e| InsightError::Validation {
                message: format!("malformed multipart body: {e}"),
            })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| InsightError::Validation {
            message: format!("failed to read upload: {e}"),
        })?;
        file = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = file else {
        return Err(InsightError::Validation {
            message: "No file part".to_string(),
        });
    };
    if filename.is_empty() {
        return Err(InsightError::Validation {
            message: "No selected file".to_string(),
        });
    }
    if !pdf::allowed_file(&filename) {
        return Err(InsightError::Validation {
            message: format!("only PDF uploads are accepted, got '{filename}'"),
        });
    }
    let stored = pdf::sanitize_filename(&filename);
    if stored.is_empty() || !pdf::allowed_file(&stored) {
        return Err(InsightError::Validation {
            message: format!("filename '{filename}' is not usable after sanitizing"),
        });
    }

    let upload_dir = PathBuf::from(&state.config.system.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| InsightError::Io {
            message: format!("failed to create {}: {}", upload_dir.display(), e),
        })?;
    let dest = upload_dir.join(&stored);
    let content_hash = blake3::hash(&bytes).to_hex().to_string();
    tokio::fs::write(&dest, &bytes)
        .await
        .map_err(|e| InsightError::Io {
            message: format!("failed to write {}: {}", dest.display(), e),
        })?;

    {
        let mut m = state.metrics.lock().await;
        m.uploads_total = m.uploads_total.saturating_add(1);
    }
    tracing::info!("Stored upload {} ({} bytes)", dest.display(), bytes.len());

    Ok(axum::Json(json!({
        "filename": stored,
        "bytes": bytes.len(),
        "content_hash": content_hash,
        "extract": format!("/nlp/extract/{stored}"),
    })))
}

/// Extract goal insights from a previously uploaded PDF
pub async fn extract_handler(
    State(state): State<HttpState>,
    UrlPath(name): UrlPath<String>,
) -> Result<impl IntoResponse> {
    let stored = pdf::sanitize_filename(&name);
    if stored.is_empty() || !pdf::allowed_file(&stored) {
        return Err(InsightError::Validation {
            message: format!("'{name}' is not an uploaded PDF name"),
        });
    }
    let upload_dir = PathBuf::from(&state.config.system.upload_dir);
    let path = upload_dir.join(&stored);
    if !path.exists() {
        return Err(InsightError::Validation {
            message: format!("no uploaded file named '{stored}'"),
        });
    }

    let started = std::time::Instant::now();
    let (text, _txt_path) =
        tokio::task::spawn_blocking(move || pdf::extract_to_text(&path, &upload_dir))
            .await
            .map_err(|e| InsightError::Internal {
                message: format!("extraction task failed: {e}"),
            })??;

    let cleaned = clean(&text);
    let insights = state.engine.process(&cleaned).await?;

    {
        let mut m = state.metrics.lock().await;
        m.extractions_total = m.extractions_total.saturating_add(1);
    }
    tracing::info!(
        "Extracted {} goal insights from {} in {}ms",
        insights.len(),
        stored,
        started.elapsed().as_millis()
    );

    Ok(axum::Json(to_json_map(&insights)))
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, engine: Arc<InsightEngine>) -> Result<()> {
    let state = HttpState {
        config: config.clone(),
        engine,
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
    };

    let request_timeout = Duration::from_millis(config.runtime.http_request_timeout_ms);

    let app = Router::new()
        .route("/health", get(health_handler))
        .nest(
            "/nlp",
            Router::new()
                .route("/info", get(info_handler))
                .route("/metrics", get(metrics_handler))
                .route("/upload", post(upload_handler))
                .route("/extract/:name", get(extract_handler)),
        )
        .layer(DefaultBodyLimit::max(config.runtime.max_upload_bytes))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            |State(metrics): State<Arc<Mutex<HttpMetrics>>>,
             req: axum::http::Request<Body>,
             next: axum::middleware::Next| async move {
                let counted = req.uri().path().starts_with("/nlp");
                let start = if counted {
                    Some(std::time::Instant::now())
                } else {
                    None
                };
                let resp = next.run(req).await;
                if let Some(start_time) = start {
                    let latency_ms = start_time.elapsed().as_millis() as f64;
                    let mut m = metrics.lock().await;
                    if latency_ms > 0.0 {
                        m.latencies.push(latency_ms);
                        if m.latencies.len() > 256 {
                            m.latencies.remove(0);
                        }
                    }
                    if !resp.status().is_success() {
                        m.errors_total = m.errors_total.saturating_add(1);
                    }
                    m.total_requests = m.total_requests.saturating_add(1);
                    m.last_request_unix = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap_or_default()
                        .as_secs();
                }
                resp
            },
        ))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_: BoxError| async {
                    StatusCode::REQUEST_TIMEOUT
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.runtime.http_bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!(
        "Starting HTTP server on {} (extraction under /nlp)",
        config.runtime.http_bind
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
