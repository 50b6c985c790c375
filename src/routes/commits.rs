//! Commit history and creation.
//!
//! - GET /repo/{repo}/log : full history across all refs
//! - GET /repo/{repo}/commit/{commit} : one commit's metadata
//! - POST /repo/{repo}/commit { message, allow-empty? } : create a commit

use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{get, post},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::git::Workspace;
use crate::git::ident::validate_commit_ref;
use crate::models::{CommitCreated, CommitRecord};

pub fn routes() -> Router {
    Router::new()
        .route("/repo/{repo}/log", get(log))
        .route("/repo/{repo}/commit/{commit}", get(commit_info))
        .route("/repo/{repo}/commit", post(create_commit))
}

async fn log(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
) -> Result<Json<Vec<CommitRecord>>> {
    Ok(Json(workspace.repo(&repo).await?.log().await?))
}

async fn commit_info(
    Extension(workspace): Extension<Workspace>,
    Path((repo, commit)): Path<(String, String)>,
) -> Result<Json<CommitRecord>> {
    validate_commit_ref(&commit)?;
    Ok(Json(workspace.repo(&repo).await?.commit_info(&commit).await?))
}

#[derive(Debug, Deserialize)]
struct CommitRequest {
    message: Option<String>,
    #[serde(rename = "allow-empty", default)]
    allow_empty: bool,
}

async fn create_commit(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitCreated>> {
    let message = request
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest("Empty commit message".to_string()))?;

    let created = workspace
        .repo(&repo)
        .await?
        .commit(message, request.allow_empty)
        .await?;
    Ok(Json(created))
}
