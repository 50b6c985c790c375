//! Commit-related DTOs.
//!
//! - `CommitRecord`: Full commit metadata with parent list and file changes
//! - `FileChange`: One changed path with its action
//! - `CommitCreated`: Result of creating a commit (branch, sha1, title)

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha1: String,
    /// Parent hashes as reported, first parent first. Empty for a root commit.
    pub parents: Vec<String>,
    #[serde(rename = "isMerge")]
    pub is_merge: bool,
    pub author: String,
    #[serde(rename = "authorDate")]
    pub author_date: DateTime<FixedOffset>,
    pub committer: String,
    #[serde(rename = "commitDate")]
    pub commit_date: DateTime<FixedOffset>,
    pub message: String,
    pub files: Vec<FileChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub action: ChangeAction,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Added,
    Removed,
    Changed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitCreated {
    pub branch: String,
    pub sha1: String,
    pub title: String,
}
