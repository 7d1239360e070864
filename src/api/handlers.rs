use axum::{extract::State, http::StatusCode, response::Json, Json as RequestJson};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::logic::{CloneCoordinator, GraphBuilder};
use crate::model::{CloneReport, CommitGraph};
use crate::vcs::{Vcs, Workspace};

/// Shared per-process context: the version-control backend plus the single
/// working-copy handle every request operates on.
pub struct AppContext<V> {
    pub vcs: V,
    pub workspace: Workspace,
}

pub type AppState<V> = Arc<AppContext<V>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CloneRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl From<AppError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: AppError) -> Self {
        (err.status(), Json(ErrorResponse::new(&err.to_string())))
    }
}

fn reject<T>(err: AppError) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    if let Some(detail) = err.detail() {
        log::error!("{}: {:#}", err, detail);
    }
    Err(err.into())
}

/// POST /api/repo
/// Clone a public repository URL and return its most recent commits.
pub async fn clone_repo<V: Vcs + 'static>(
    State(ctx): State<AppState<V>>,
    RequestJson(req): RequestJson<CloneRequest>,
) -> Result<Json<CloneReport>, (StatusCode, Json<ErrorResponse>)> {
    let url = req.url.unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        CloneCoordinator::clone_repository(&ctx.vcs, &ctx.workspace, &url)
    })
    .await;

    match result {
        Ok(Ok(report)) => Ok(Json(report)),
        Ok(Err(err)) => reject(err),
        Err(join_err) => reject(AppError::Unexpected(anyhow::anyhow!(join_err))),
    }
}

/// GET /api/commit-tree
/// Return the commit DAG (nodes & edges) for the cloned repo.
pub async fn commit_tree<V: Vcs + 'static>(
    State(ctx): State<AppState<V>>,
) -> Result<Json<CommitGraph>, (StatusCode, Json<ErrorResponse>)> {
    let result =
        tokio::task::spawn_blocking(move || GraphBuilder::build(&ctx.vcs, &ctx.workspace)).await;

    match result {
        Ok(Ok(graph)) => Ok(Json(graph)),
        Ok(Err(err)) => reject(err),
        Err(join_err) => reject(AppError::Unexpected(anyhow::anyhow!(join_err))),
    }
}
