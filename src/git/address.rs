//! Remote address handling.
//!
//! Turns the remote given to clone into a canonical address plus the short
//! project name used when the caller does not pick a local name. Understands
//! URL-style (`scheme://host/path/proj.git`), scp-style
//! (`user@host:path/proj.git`) and plain filesystem paths.

use crate::error::{AppError, Result};

pub struct Address {
    pub address: String,
    pub short_project: String,
}

pub fn parse_address(raw: &str) -> Result<Address> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('-') {
        return Err(AppError::BadRequest(format!("Illegal remote url: {raw}")));
    }

    let tail = match raw.split_once("://") {
        Some((_scheme, rest)) => rest,
        None => raw.split_once(':').map(|(_, rest)| rest).unwrap_or(raw),
    };

    let last = tail.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let short = last.strip_suffix(".git").unwrap_or(last);
    if short.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Cannot derive a project name from: {raw}"
        )));
    }

    Ok(Address {
        address: raw.to_string(),
        short_project: short.to_string(),
    })
}
