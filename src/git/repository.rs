//! Repository operations.
//!
//! Every operation is one subprocess invocation (plus, for some, a
//! filesystem step) under the repository's reader/writer lock: mutating
//! operations are exclusive, read-only operations share. The lock is
//! attached when the resolver hands out the `Repository`, so holding a
//! value of this type is holding the right to serialize against it.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, Result};
use crate::git::command::{classify_failure, git_expect, run_git};
use crate::git::fslist;
use crate::git::parse::{self, LOG_FORMAT};
use crate::models::{BranchInfo, CommitCreated, CommitRecord, FsEntry, RemoteInfo, TreeEntry};

/// What a working-tree path turned out to hold.
pub enum WorktreeContent {
    File(Vec<u8>),
    Dir(Vec<FsEntry>),
}

pub struct Repository {
    pub name: String,
    pub dir: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl Repository {
    pub(crate) fn new(name: String, dir: PathBuf, lock: Arc<RwLock<()>>) -> Self {
        Self { name, dir, lock }
    }

    fn pretty_arg() -> String {
        format!("--pretty={LOG_FORMAT}")
    }

    // ---- read-only operations ----

    /// Full history across all refs. An empty repository has no refs to
    /// walk, which is an empty history, not an error.
    pub async fn log(&self) -> Result<Vec<CommitRecord>> {
        let _guard = self.lock.read().await;
        let pretty = Self::pretty_arg();
        let out = git_expect(&["log", "--all", &pretty], &self.dir).await?;
        Ok(parse::parse_log(&out.stdout_text())?)
    }

    /// Metadata of one commit, including its file-change summary.
    pub async fn commit_info(&self, reference: &str) -> Result<CommitRecord> {
        let _guard = self.lock.read().await;
        let pretty = Self::pretty_arg();
        let out = git_expect(&["show", "--name-status", &pretty, reference], &self.dir).await?;
        Ok(parse::parse_commit_show(&out.stdout_text())?)
    }

    /// Raw contents of `path` at `rev`.
    pub async fn show_file(&self, rev: &str, path: &str) -> Result<Vec<u8>> {
        let _guard = self.lock.read().await;
        let spec = format!("{rev}:{path}");
        let out = git_expect(&["show", &spec], &self.dir).await?;
        Ok(out.stdout)
    }

    /// Recursive tree at `rev`, rooted at `path` (empty = repository root).
    pub async fn ls_tree(&self, rev: &str, path: &str) -> Result<Vec<TreeEntry>> {
        let _guard = self.lock.read().await;
        let out = if path.is_empty() {
            git_expect(&["ls-tree", "-t", "-r", rev], &self.dir).await?
        } else {
            git_expect(&["ls-tree", "-t", "-r", rev, "--", path], &self.dir).await?
        };
        parse::parse_ls_tree(&out.stdout_text())?
            .ok_or_else(|| AppError::NotFound(format!("No such path '{path}' in {rev}")))
    }

    pub async fn branches(&self) -> Result<Vec<BranchInfo>> {
        let _guard = self.lock.read().await;
        let out = git_expect(&["branch", "--list"], &self.dir).await?;
        Ok(parse::parse_branches(&out.stdout_text()))
    }

    pub async fn config_get(&self, name: &str) -> Result<Vec<String>> {
        let _guard = self.lock.read().await;
        let out = run_git(&["config", "--local", "--get-all", name], &self.dir).await?;
        // Exit 1 with a silent stderr is "key not set": an empty sequence.
        match out.exit_code {
            0 => Ok(parse::parse_config(&out.stdout_text())),
            1 if out.stderr.trim().is_empty() => Ok(Vec::new()),
            _ => Err(classify_failure(&out.stderr)),
        }
    }

    pub async fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        let _guard = self.lock.read().await;
        let out = git_expect(&["remote", "-v"], &self.dir).await?;
        Ok(parse::parse_remotes(&out.stdout_text()))
    }

    /// Read a working-tree path straight from disk: file bytes, or a
    /// recursive listing for a directory. Symlinks and special files read
    /// like files; a dangling link reports NotFound.
    pub async fn worktree_read(&self, path: &str) -> Result<WorktreeContent> {
        let _guard = self.lock.read().await;
        let full = if path.is_empty() {
            self.dir.clone()
        } else {
            self.dir.join(path)
        };

        let meta = tokio::fs::symlink_metadata(&full)
            .await
            .map_err(|_| AppError::NotFound(format!("No such file: {path}")))?;

        if meta.is_dir() {
            Ok(WorktreeContent::Dir(fslist::list_dir(&full)?))
        } else {
            let bytes = tokio::fs::read(&full).await.map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    AppError::NotFound(format!("No such file: {path}"))
                } else {
                    AppError::Filesystem(err)
                }
            })?;
            Ok(WorktreeContent::File(bytes))
        }
    }

    // ---- mutating operations ----

    pub async fn init(&self, bare: bool, shared: bool) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut args = vec!["init"];
        if bare {
            args.push("--bare");
        }
        if shared {
            args.push("--shared");
        }
        info!(repo = %self.name, bare, shared, "init repo");
        match git_expect(&args, &self.dir).await {
            Ok(_) => Ok(()),
            Err(err) => {
                // The reserved directory must not shadow later attempts.
                let _ = tokio::fs::remove_dir_all(&self.dir).await;
                Err(err)
            }
        }
    }

    pub async fn clone_from(&self, address: &str, bare: bool) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut args = vec!["clone"];
        if bare {
            args.push("--bare");
        }
        args.extend(["--", address, "."]);
        info!(repo = %self.name, address, bare, "clone repo");
        match git_expect(&args, &self.dir).await {
            Ok(_) => Ok(()),
            Err(err) => {
                let _ = tokio::fs::remove_dir_all(&self.dir).await;
                Err(err)
            }
        }
    }

    pub async fn delete(self) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, "delete repo");
        tokio::fs::remove_dir_all(&self.dir).await?;
        Ok(())
    }

    pub async fn config_add(&self, name: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        git_expect(&["config", "--local", "--add", name, value], &self.dir).await?;
        Ok(())
    }

    pub async fn config_replace(&self, name: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        git_expect(
            &["config", "--local", "--replace-all", name, value],
            &self.dir,
        )
        .await?;
        Ok(())
    }

    pub async fn config_unset(&self, name: &str, all: bool) -> Result<()> {
        let _guard = self.lock.write().await;
        let unset = if all { "--unset-all" } else { "--unset" };
        git_expect(&["config", "--local", unset, name], &self.dir).await?;
        Ok(())
    }

    pub async fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, name, url, "add remote");
        git_expect(&["remote", "add", name, url], &self.dir).await?;
        Ok(())
    }

    pub async fn remote_remove(&self, name: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, name, "remove remote");
        git_expect(&["remote", "rm", name], &self.dir).await?;
        Ok(())
    }

    pub async fn branch_create(&self, name: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, branch = name, "create branch");
        git_expect(&["branch", "--", name], &self.dir).await?;
        Ok(())
    }

    /// Switch to a branch that must already exist. `show-ref` is the
    /// packed-refs-safe existence check; probing the loose ref file on disk
    /// misses packed branches.
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        let refname = format!("refs/heads/{branch}");
        let check = run_git(&["show-ref", "--verify", "--quiet", &refname], &self.dir).await?;
        if check.exit_code != 0 {
            return Err(AppError::NotFound(format!("Unknown branch {branch}")));
        }
        info!(repo = %self.name, branch, "checkout");
        git_expect(&["checkout", branch], &self.dir).await?;
        Ok(())
    }

    pub async fn mv(&self, source: &str, destination: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, source, destination, "move path");
        git_expect(&["mv", "--", source, destination], &self.dir).await?;
        Ok(())
    }

    pub async fn remove_path(&self, path: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        info!(repo = %self.name, path, "remove path");
        git_expect(&["rm", "-r", "-f", "--", path], &self.dir).await?;
        Ok(())
    }

    /// Write `bytes` to a working-tree file and stage it. Parent
    /// directories are created as needed; only regular files may be
    /// overwritten.
    pub async fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let _guard = self.lock.write().await;
        if path.is_empty() {
            return Err(AppError::BadRequest("Missing file path".to_string()));
        }
        let full = self.dir.join(path);

        match tokio::fs::symlink_metadata(&full).await {
            Ok(meta) if !meta.is_file() => {
                return Err(AppError::BadRequest(format!("Not a regular file: {path}")));
            }
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if let Some(parent) = full.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            Err(err) => return Err(err.into()),
        }

        tokio::fs::write(&full, bytes).await?;
        info!(repo = %self.name, path, "write file");
        git_expect(&["add", "--", path], &self.dir).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str, allow_empty: bool) -> Result<CommitCreated> {
        let _guard = self.lock.write().await;
        let mut args = vec!["commit", "-m", message];
        if allow_empty {
            args.push("--allow-empty");
        }
        info!(repo = %self.name, "commit");
        let out = git_expect(&args, &self.dir).await?;
        Ok(parse::parse_commit_summary(&out.stdout_text())?)
    }

    pub async fn push(&self, remote: &str, branch: Option<&str>) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut args = vec!["push", remote];
        if let Some(branch) = branch {
            args.push(branch);
        }
        info!(repo = %self.name, remote, branch, "push");
        git_expect(&args, &self.dir).await?;
        Ok(())
    }
}
