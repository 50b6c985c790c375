//! Session workspaces and repository resolution.
//!
//! A workspace is a directory under the configured root, owned by exactly
//! one session token. Repositories are its immediate subdirectories; a
//! caller can only ever see the repositories inside its own workspace.
//!
//! The token is an opaque capability: the manager mints it, binds it to a
//! directory, and validates it on every request. Nothing here knows or
//! cares that the HTTP layer carries it in a cookie.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::git::ident::validate_repo_name;
use crate::git::repository::Repository;

/// Fresh tokens to try before giving up on workspace creation.
const MINT_ATTEMPTS: usize = 8;

/// Per-repository reader/writer locks, keyed by resolved directory.
///
/// Mutating operations hold the write half for the whole subprocess
/// invocation; read-only operations share the read half. The map only
/// grows, but entries are a pointer each.
#[derive(Clone, Default)]
pub struct RepoLocks {
    inner: Arc<Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>>,
}

impl RepoLocks {
    pub fn lock_for(&self, dir: &Path) -> Arc<RwLock<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(dir.to_path_buf()).or_default().clone()
    }
}

pub struct WorkspaceManager {
    root: PathBuf,
    locks: RepoLocks,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: RepoLocks::default(),
        }
    }

    /// Create the workspace root if missing. Called once at startup.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolve a session token to its workspace. A token that is absent,
    /// malformed, or no longer backed by a directory gets a fresh workspace
    /// minted instead. Returns the workspace and whether it was minted.
    pub async fn resolve(&self, token: Option<&str>) -> Result<(Workspace, bool)> {
        if let Some(token) = token
            && Uuid::try_parse(token).is_ok()
        {
            let dir = self.root.join(token);
            if is_dir(&dir).await {
                debug!(token, "reusing workspace");
                return Ok((self.workspace(token.to_string(), dir), false));
            }
        }

        // `create_dir` fails on collision, so two concurrent first requests
        // can never end up sharing a directory.
        for _ in 0..MINT_ATTEMPTS {
            let token = Uuid::new_v4().to_string();
            let dir = self.root.join(&token);
            match tokio::fs::create_dir(&dir).await {
                Ok(()) => {
                    info!(token = %token, dir = %dir.display(), "minted workspace");
                    return Ok((self.workspace(token, dir), true));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(AppError::Internal(
            "could not allocate a workspace directory".to_string(),
        ))
    }

    fn workspace(&self, token: String, dir: PathBuf) -> Workspace {
        Workspace {
            token,
            dir,
            locks: self.locks.clone(),
        }
    }
}

/// One session's isolated directory of repositories.
#[derive(Clone)]
pub struct Workspace {
    pub token: String,
    pub dir: PathBuf,
    locks: RepoLocks,
}

impl Workspace {
    /// Every directory entry under the workspace root is a repository.
    pub async fn list_repos(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Path a repository of this name would occupy, name validated.
    fn repo_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.dir.join(validate_repo_name(name)?))
    }

    /// Resolve an existing repository together with its serialization lock.
    pub async fn repo(&self, name: &str) -> Result<Repository> {
        let dir = self.repo_path(name)?;
        if !is_dir(&dir).await {
            return Err(AppError::NotFound(format!("Unknown repo: {name}")));
        }
        let lock = self.locks.lock_for(&dir);
        Ok(Repository::new(name.to_string(), dir, lock))
    }

    /// Reserve the directory for a new repository (init/clone target). The
    /// atomic `create_dir` doubles as the existence check, so two racing
    /// creations cannot both win.
    pub async fn reserve_repo(&self, name: &str) -> Result<Repository> {
        let dir = self.repo_path(name)?;
        match tokio::fs::create_dir(&dir).await {
            Ok(()) => {
                let lock = self.locks.lock_for(&dir);
                Ok(Repository::new(name.to_string(), dir, lock))
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(AppError::AlreadyExists(
                format!("A repository {name} already exists"),
            )),
            Err(err) => Err(err.into()),
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mints_a_workspace_for_a_missing_token() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(tmp.path());

        let (workspace, minted) = manager.resolve(None).await.unwrap();
        assert!(minted);
        assert!(workspace.dir.is_dir());
        assert!(Uuid::try_parse(&workspace.token).is_ok());
    }

    #[tokio::test]
    async fn reuses_a_workspace_for_a_known_token() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(tmp.path());

        let (first, _) = manager.resolve(None).await.unwrap();
        let (second, minted) = manager.resolve(Some(&first.token)).await.unwrap();
        assert!(!minted);
        assert_eq!(first.dir, second.dir);
    }

    #[tokio::test]
    async fn rejects_a_token_that_is_not_a_capability_it_issued() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(tmp.path());

        // Traversal-shaped and free-form tokens never map onto a directory.
        for bogus in ["../escape", "nope", "a/b", ""] {
            let (workspace, minted) = manager.resolve(Some(bogus)).await.unwrap();
            assert!(minted, "token {bogus:?} was accepted");
            assert!(workspace.dir.starts_with(tmp.path()));
        }
    }

    #[tokio::test]
    async fn repo_resolution_requires_an_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(tmp.path());
        let (workspace, _) = manager.resolve(None).await.unwrap();

        assert!(matches!(
            workspace.repo("ghost").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            workspace.repo("../escape").await,
            Err(AppError::InvalidIdentifier(_))
        ));

        workspace.reserve_repo("real").await.unwrap();
        assert!(workspace.repo("real").await.is_ok());
        assert_eq!(workspace.list_repos().await.unwrap(), vec!["real"]);
    }

    #[tokio::test]
    async fn reserving_twice_reports_the_collision() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(tmp.path());
        let (workspace, _) = manager.resolve(None).await.unwrap();

        workspace.reserve_repo("dup").await.unwrap();
        assert!(matches!(
            workspace.reserve_repo("dup").await,
            Err(AppError::AlreadyExists(_))
        ));
    }

    #[test]
    fn same_directory_shares_one_lock() {
        let locks = RepoLocks::default();
        let a = locks.lock_for(Path::new("/tmp/x"));
        let b = locks.lock_for(Path::new("/tmp/x"));
        let c = locks.lock_for(Path::new("/tmp/y"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
