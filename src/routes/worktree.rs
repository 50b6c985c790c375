//! Working-tree access: what is on disk, committed or not.
//!
//! - GET /repo/{repo}/tree/{*path} : file bytes, or a recursive listing
//!   for a directory (GET /repo/{repo}/tree lists the root)
//! - PUT /repo/{repo}/tree/{*path} : write the raw body and stage the file
//! - DELETE /repo/{repo}/tree/{*path} : `git rm -r -f` the path
//! - POST /repo/{repo}/mv { source, destination } : rename a path

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::Path,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::git::Workspace;
use crate::git::ident::sanitize_tree_path;
use crate::git::repository::WorktreeContent;

pub fn routes() -> Router {
    Router::new()
        .route("/repo/{repo}/tree", get(read_root))
        .route(
            "/repo/{repo}/tree/{*path}",
            get(read_path).put(write_path).delete(delete_path),
        )
        .route("/repo/{repo}/mv", post(move_path))
}

async fn read_root(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
) -> Result<Response> {
    read(workspace, &repo, "").await
}

async fn read_path(
    Extension(workspace): Extension<Workspace>,
    Path((repo, path)): Path<(String, String)>,
) -> Result<Response> {
    let path = sanitize_tree_path(&path)?;
    read(workspace, &repo, &path).await
}

async fn read(workspace: Workspace, repo: &str, path: &str) -> Result<Response> {
    let content = workspace.repo(repo).await?.worktree_read(path).await?;
    Ok(match content {
        WorktreeContent::File(bytes) => bytes.into_response(),
        WorktreeContent::Dir(entries) => Json(entries).into_response(),
    })
}

async fn write_path(
    Extension(workspace): Extension<Workspace>,
    Path((repo, path)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>> {
    let path = sanitize_tree_path(&path)?;
    workspace
        .repo(&repo)
        .await?
        .write_file(&path, &body)
        .await?;
    Ok(Json(json!({})))
}

async fn delete_path(
    Extension(workspace): Extension<Workspace>,
    Path((repo, path)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let path = sanitize_tree_path(&path)?;
    workspace.repo(&repo).await?.remove_path(&path).await?;
    Ok(Json(json!({})))
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    source: String,
    destination: String,
}

async fn move_path(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Value>> {
    let source = sanitize_tree_path(&request.source)?;
    let destination = sanitize_tree_path(&request.destination)?;
    if source.is_empty() || destination.is_empty() {
        return Err(crate::error::AppError::BadRequest(
            "Both source and destination are required".to_string(),
        ));
    }
    workspace
        .repo(&repo)
        .await?
        .mv(&source, &destination)
        .await?;
    Ok(Json(json!({})))
}
