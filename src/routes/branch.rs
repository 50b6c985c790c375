//! Branch listing, creation and checkout.
//!
//! - GET /repo/{repo}/branch : list branches with the current one flagged
//! - POST /repo/{repo}/branch { branch } : create a branch
//! - POST /repo/{repo}/checkout { branch } : switch to an existing branch

use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::git::Workspace;
use crate::git::ident::reject_option_like;
use crate::models::BranchInfo;

pub fn routes() -> Router {
    Router::new()
        .route(
            "/repo/{repo}/branch",
            get(list_branches).post(create_branch),
        )
        .route("/repo/{repo}/checkout", post(checkout))
}

async fn list_branches(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
) -> Result<Json<Vec<BranchInfo>>> {
    Ok(Json(workspace.repo(&repo).await?.branches().await?))
}

#[derive(Debug, Deserialize)]
struct BranchRequest {
    branch: Option<String>,
}

fn required_branch(request: &BranchRequest) -> Result<&str> {
    let branch = request
        .branch
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::BadRequest("No branch name is specified".to_string()))?;
    reject_option_like(branch, "branch name")
}

async fn create_branch(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<BranchRequest>,
) -> Result<Json<Value>> {
    let branch = required_branch(&request)?;
    workspace.repo(&repo).await?.branch_create(branch).await?;
    Ok(Json(json!({ "branch": branch })))
}

async fn checkout(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(request): Json<BranchRequest>,
) -> Result<Json<Value>> {
    let branch = required_branch(&request)?;
    workspace.repo(&repo).await?.checkout(branch).await?;
    Ok(Json(json!({ "branch": branch })))
}
