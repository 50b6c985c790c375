//! Repository metadata DTOs.
//!
//! - `BranchInfo`: Branch name with current-branch flag
//! - `RemoteInfo`: Remote name and URL, deduplicated across fetch/push lines
//! - `ConfigValues`: All values of one (possibly multi-valued) config option

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValues {
    pub values: Vec<String>,
}
