//! Repository config endpoints.
//!
//! - GET /repo/{repo}/config?name= : all values of one option
//! - POST /repo/{repo}/config { name, value } : add a value
//! - PUT /repo/{repo}/config { name, value } : replace all values
//! - DELETE /repo/{repo}/config { name, unset-all? } : unset

use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::git::Workspace;
use crate::git::ident::reject_option_like;
use crate::models::ConfigValues;

pub fn routes() -> Router {
    Router::new().route(
        "/repo/{repo}/config",
        get(get_config)
            .post(add_config)
            .put(replace_config)
            .delete(unset_config),
    )
}

#[derive(Debug, Deserialize)]
struct ConfigQuery {
    #[serde(default)]
    name: String,
}

async fn get_config(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Query(query): Query<ConfigQuery>,
) -> Result<Json<ConfigValues>> {
    reject_option_like(&query.name, "option name")?;
    let values = workspace.repo(&repo).await?.config_get(&query.name).await?;
    Ok(Json(ConfigValues { values }))
}

#[derive(Debug, Deserialize)]
struct ConfigBody {
    name: String,
    value: String,
}

async fn add_config(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(body): Json<ConfigBody>,
) -> Result<Json<Value>> {
    reject_option_like(&body.name, "option name")?;
    workspace
        .repo(&repo)
        .await?
        .config_add(&body.name, &body.value)
        .await?;
    Ok(Json(json!({})))
}

async fn replace_config(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(body): Json<ConfigBody>,
) -> Result<Json<Value>> {
    reject_option_like(&body.name, "option name")?;
    workspace
        .repo(&repo)
        .await?
        .config_replace(&body.name, &body.value)
        .await?;
    Ok(Json(json!({})))
}

#[derive(Debug, Deserialize)]
struct UnsetBody {
    name: String,
    #[serde(rename = "unset-all", default)]
    unset_all: bool,
}

async fn unset_config(
    Extension(workspace): Extension<Workspace>,
    Path(repo): Path<String>,
    Json(body): Json<UnsetBody>,
) -> Result<Json<Value>> {
    reject_option_like(&body.name, "option name")?;
    workspace
        .repo(&repo)
        .await?
        .config_unset(&body.name, body.unset_all)
        .await?;
    Ok(Json(json!({})))
}
