//! Committed-state browsing.
//!
//! - GET /repo/{repo}/show/{*path}?rev= : raw file bytes at a revision
//! - GET /repo/{repo}/ls-tree/{*path}?rev= : recursive tree at a revision
//! - GET /repo/{repo}/ls-tree?rev= : tree rooted at the repository root
//!
//! `rev` defaults to HEAD and may be any revision expression git accepts.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::error::Result;
use crate::git::Workspace;
use crate::git::ident::{reject_option_like, sanitize_tree_path};
use crate::models::TreeEntry;

pub fn routes() -> Router {
    Router::new()
        .route("/repo/{repo}/show/{*path}", get(show_file))
        .route("/repo/{repo}/ls-tree", get(ls_tree_root))
        .route("/repo/{repo}/ls-tree/{*path}", get(ls_tree))
}

#[derive(Debug, Deserialize)]
struct RevQuery {
    rev: Option<String>,
}

fn revision(query: &RevQuery) -> Result<&str> {
    let rev = query.rev.as_deref().unwrap_or("HEAD");
    reject_option_like(rev, "revision")
}

async fn show_file(
    Extension(workspace): Extension<Workspace>,
    Path((repo, path)): Path<(String, String)>,
    Query(query): Query<RevQuery>,
) -> Result<impl IntoResponse> {
    let rev = revision(&query)?;
    let path = sanitize_tree_path(&path)?;
    let bytes = workspace.repo(&repo).await?.show_file(rev, &path).await?;
    Ok(bytes)
}

async fn ls_tree(
    Extension(workspace): Extension<Workspace>,
    Path((repo, path)): Path<(String, String)>,
    Query(query): Query<RevQuery>,
) -> Result<Json<Vec<TreeEntry>>> {
    let rev = revision(&query)?;
    let path = sanitize_tree_path(&path)?;
    let entries = workspace.repo(&repo).await?.ls_tree(rev, &path).await?;
    Ok(Json(entries))
}

async fn ls_tree_root(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Query(query): Query<RevQuery>,
) -> Result<Json<Vec<TreeEntry>>> {
    let rev = revision(&query)?;
    let entries = workspace.repo(&repo).await?.ls_tree(rev, "").await?;
    Ok(Json(entries))
}
