//! API route handlers - maps HTTP endpoints to git operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repos`: Workspace listing, init, clone, delete
//! - `config`: Read/add/replace/unset config values
//! - `remote`: Remote listing and management, push
//! - `branch`: Branch listing, creation, checkout
//! - `commits`: History, single-commit metadata, commit creation
//! - `tree`: Committed state (show, ls-tree)
//! - `worktree`: On-disk working tree (read/write/delete, mv)
//! - `session`: Workspace cookie middleware
//!
//! Handlers receive the session `Workspace` as a request extension
//! installed by the session middleware; none of them touch the cookie.

pub mod branch;
pub mod commits;
pub mod config;
pub mod remote;
pub mod repos;
pub mod session;
pub mod tree;
pub mod worktree;

use std::sync::Arc;

use axum::{Router, middleware};

use crate::git::WorkspaceManager;

pub struct AppState {
    pub workspaces: WorkspaceManager,
}

pub type SharedState = Arc<AppState>;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .merge(repos::routes())
        .merge(config::routes())
        .merge(remote::routes())
        .merge(branch::routes())
        .merge(commits::routes())
        .merge(tree::routes())
        .merge(worktree::routes())
        .layer(middleware::from_fn_with_state(
            state,
            session::attach_workspace,
        ))
}
