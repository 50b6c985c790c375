//! Remote management and push.
//!
//! - GET /repo/{repo}/remote : list remotes, deduplicated by name
//! - POST /repo/{repo}/remote { name, url } : add a remote
//! - DELETE /repo/{repo}/remote { name } : remove a remote
//! - POST /repo/{repo}/push { remote?, branch? } : push (default origin)

use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::git::Workspace;
use crate::git::ident::reject_option_like;
use crate::models::RemoteInfo;

pub fn routes() -> Router {
    Router::new()
        .route(
            "/repo/{repo}/remote",
            get(list_remotes).post(add_remote).delete(remove_remote),
        )
        .route("/repo/{repo}/push", post(push))
}

async fn list_remotes(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
) -> Result<Json<Vec<RemoteInfo>>> {
    Ok(Json(workspace.repo(&repo).await?.remotes().await?))
}

#[derive(Debug, Deserialize)]
struct AddRemoteRequest {
    name: String,
    url: String,
}

async fn add_remote(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<AddRemoteRequest>,
) -> Result<Json<Value>> {
    reject_option_like(&request.name, "remote name")?;
    reject_option_like(&request.url, "remote url")?;
    workspace
        .repo(&repo)
        .await?
        .remote_add(&request.name, &request.url)
        .await?;
    Ok(Json(json!({})))
}

#[derive(Debug, Deserialize)]
struct RemoveRemoteRequest {
    name: String,
}

async fn remove_remote(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<RemoveRemoteRequest>,
) -> Result<Json<Value>> {
    reject_option_like(&request.name, "remote name")?;
    workspace
        .repo(&repo)
        .await?
        .remote_remove(&request.name)
        .await?;
    Ok(Json(json!({})))
}

#[derive(Debug, Deserialize)]
struct PushRequest {
    remote: Option<String>,
    branch: Option<String>,
}

async fn push(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<PushRequest>,
) -> Result<Json<Value>> {
    let remote = request.remote.as_deref().unwrap_or("origin");
    reject_option_like(remote, "remote name")?;
    let branch = match request.branch.as_deref() {
        Some(branch) => Some(reject_option_like(branch, "branch name")?),
        None => None,
    };

    workspace.repo(&repo).await?.push(remote, branch).await?;
    Ok(Json(json!({})))
}
