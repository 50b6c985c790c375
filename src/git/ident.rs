//! Whitelisting for caller-supplied identifiers.
//!
//! Every value that ends up inside a filesystem path or a git argument
//! vector passes through one of these gates first. This is the sole defense
//! against path traversal for repository names, so the rules are strict:
//! full-match on `[A-Za-z0-9._-]+`, with `.` and `..` carved out because
//! they alias other directories despite fitting the charset.

use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// Validate a repository name. Returns the name unchanged on success.
pub fn validate_repo_name(name: &str) -> Result<&str> {
    let charset_ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));

    if !charset_ok || name == "." || name == ".." {
        return Err(AppError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}

/// Validate a commit reference: 5 to 40 hex characters.
pub fn validate_commit_ref(value: &str) -> Result<&str> {
    if (5..=40).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(value)
    } else {
        Err(AppError::InvalidIdentifier(value.to_string()))
    }
}

/// Values spliced into a git argument vector must not look like options.
/// git parses the actual syntax; this only keeps a caller-supplied value
/// from masquerading as a command-line flag.
pub fn reject_option_like<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() || value.starts_with('-') {
        return Err(AppError::BadRequest(format!("Illegal {what}: {value}")));
    }
    Ok(value)
}

/// Normalize a wildcard path segment into a repo-relative path. Trailing
/// slashes are dropped and an empty result addresses the repository root;
/// any component that could escape the working tree is rejected.
pub fn sanitize_tree_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim_matches('/');
    let path = Path::new(trimmed);

    let safe = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(AppError::BadRequest(format!("Illegal path: {raw}")));
    }

    let clean: PathBuf = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    Ok(clean.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whitelisted_names_unchanged() {
        for name in ["repo", "Repo-1", "a.b_c", "0", "x-y.z", "...a"] {
            assert_eq!(validate_repo_name(name).unwrap(), name);
        }
    }

    #[test]
    fn rejects_traversal_and_metacharacters() {
        for name in ["", "a/b", "a\\b", "..", ".", "a b", "a;b", "$(x)", "a|b", "../up"] {
            assert!(validate_repo_name(name).is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn commit_refs_are_short_to_full_hex() {
        assert!(validate_commit_ref("abc12").is_ok());
        assert!(validate_commit_ref(&"a".repeat(40)).is_ok());
        assert!(validate_commit_ref("abc1").is_err());
        assert!(validate_commit_ref(&"a".repeat(41)).is_err());
        assert!(validate_commit_ref("zzzzzz").is_err());
        assert!(validate_commit_ref("HEAD").is_err());
    }

    #[test]
    fn option_like_values_are_rejected() {
        assert!(reject_option_like("-f", "branch").is_err());
        assert!(reject_option_like("--mirror", "remote").is_err());
        assert!(reject_option_like("", "branch").is_err());
        assert_eq!(reject_option_like("main", "branch").unwrap(), "main");
    }

    #[test]
    fn tree_paths_are_normalized() {
        assert_eq!(sanitize_tree_path("a/b/").unwrap(), "a/b");
        assert_eq!(sanitize_tree_path("").unwrap(), "");
        assert_eq!(sanitize_tree_path("./a/./b").unwrap(), "a/b");
        assert!(sanitize_tree_path("a/../b").is_err());
        assert!(sanitize_tree_path("..").is_err());
    }
}
