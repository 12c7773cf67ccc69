use crate::app::dto::*;
use crate::app::engine::AnalysisEngine;
use crate::domain::error::AnalysisError;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared handler state. The analyzed root is fixed when the server starts.
#[derive(Clone)]
pub struct HttpState {
    pub engine: AnalysisEngine,
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

/// Bad input (unknown file, invalid pattern) is a 400, anything else a 500.
fn error_status(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::UnknownFile(_)) | Some(AnalysisError::InvalidPattern { .. }) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn run_blocking<T, F>(f: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match spawn_blocking(f).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => api_error(error_status(&e), format!("{e:#}")).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

pub fn build_router(engine: AnalysisEngine, root: PathBuf) -> Router {
    let state = Arc::new(HttpState { engine, root });

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/cycles", post(cycles))
        .route("/orphans", post(orphans))
        .route("/file", post(file))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: AnalysisEngine, root: PathBuf, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine, root.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, root = %root.display(), "http server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(HealthResponse {
        root: state.root.to_string_lossy().to_string(),
        status: "ok".to_string(),
    })
}

async fn analyze(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let engine = state.engine.clone();
    let root = state.root.clone();
    run_blocking(move || engine.analyze(&root, req.options.as_ref())).await
}

async fn cycles(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let engine = state.engine.clone();
    let root = state.root.clone();
    run_blocking(move || engine.cycles(&root, req.options.as_ref())).await
}

async fn orphans(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let engine = state.engine.clone();
    let root = state.root.clone();
    run_blocking(move || engine.orphans(&root, req.options.as_ref())).await
}

async fn file(State(state): State<Arc<HttpState>>, Json(req): Json<FileRequest>) -> Response {
    let engine = state.engine.clone();
    let root = state.root.clone();
    run_blocking(move || engine.file(&root, &req.file, req.options.as_ref())).await
}
