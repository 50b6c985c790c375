//! Committed-tree DTOs.
//!
//! `TreeEntry` is one node of the hierarchy built from a recursive
//! `ls-tree` listing. `contents` is present only for tree nodes and holds
//! exactly the immediate children, in the order git emitted them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    pub mode: String,
    pub sha1: String,
    #[serde(rename = "type")]
    pub kind: TreeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<TreeEntry>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Blob,
    Tree,
}
