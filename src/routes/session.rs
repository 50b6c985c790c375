//! Session workspace binding.
//!
//! The opaque workspace token travels in a cookie, but nothing below this
//! layer knows that: the middleware resolves the token to a `Workspace`,
//! inserts it as a request extension, and re-issues the cookie whenever a
//! fresh workspace had to be minted.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::SharedState;

pub const WORKSPACE_COOKIE: &str = "workspace";

pub async fn attach_workspace(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = cookie_value(req.headers(), WORKSPACE_COOKIE);
    let (workspace, minted) = match state.workspaces.resolve(token.as_deref()).await {
        Ok(resolved) => resolved,
        Err(err) => return err.into_response(),
    };

    let cookie = format!("{WORKSPACE_COOKIE}={}; Path=/; HttpOnly", workspace.token);
    req.extensions_mut().insert(workspace);

    let mut response = next.run(req).await;
    if minted && let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
