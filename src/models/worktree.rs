//! Working-tree DTOs.
//!
//! `FsEntry` mirrors `TreeEntry`'s nested shape but is sourced from the
//! filesystem rather than git output: it describes what is on disk in the
//! working directory, committed or not.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FsKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<FsEntry>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FsKind {
    File,
    Dir,
}
