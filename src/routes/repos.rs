//! Workspace-level repository management.
//!
//! - GET / : list repositories in the session workspace
//! - POST /init { repo, bare?, shared? } : create a repository
//! - POST /clone { remote, repo?, bare? } : clone from a remote
//! - DELETE /repo/{repo} : delete a repository

use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::git::Workspace;
use crate::git::address::parse_address;

pub fn routes() -> Router {
    Router::new()
        .route("/", get(list_repos))
        .route("/init", post(init_repo))
        .route("/clone", post(clone_repo))
        .route("/repo/{repo}", delete(delete_repo))
}

async fn list_repos(Extension(workspace): Extension<Workspace>) -> Result<Json<Vec<String>>> {
    Ok(Json(workspace.list_repos().await?))
}

#[derive(Debug, Deserialize)]
struct InitRequest {
    repo: String,
    #[serde(default)]
    bare: bool,
    #[serde(default)]
    shared: bool,
}

async fn init_repo(
    Extension(workspace): Extension<Workspace>,
    Json(request): Json<InitRequest>,
) -> Result<Json<Value>> {
    let repo = workspace.reserve_repo(&request.repo).await?;
    repo.init(request.bare, request.shared).await?;
    Ok(Json(json!({ "repo": request.repo })))
}

#[derive(Debug, Deserialize)]
struct CloneRequest {
    remote: String,
    repo: Option<String>,
    #[serde(default)]
    bare: bool,
}

async fn clone_repo(
    Extension(workspace): Extension<Workspace>,
    Json(request): Json<CloneRequest>,
) -> Result<Json<Value>> {
    let address = parse_address(&request.remote)?;
    let name = request.repo.as_deref().unwrap_or(&address.short_project);

    let repo = workspace.reserve_repo(name).await?;
    repo.clone_from(&address.address, request.bare).await?;
    Ok(Json(json!({ "repo": name })))
}

async fn delete_repo(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
) -> Result<Json<Value>> {
    workspace.repo(&repo).await?.delete().await?;
    Ok(Json(json!({})))
}
