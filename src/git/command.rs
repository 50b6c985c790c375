//! Git subprocess execution.
//!
//! Every operation in this service shells out to the system `git` binary.
//! Arguments are always passed as an argv vector, never through a shell, and
//! both output streams are captured in full before anything is parsed.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, Result};

/// Raw result of one git invocation. Transient: consumed immediately by a
/// parser or returned as bytes, never cached.
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl CommandResult {
    pub fn stdout_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

/// Run `git` with `args` in `cwd`, capturing all output. Only a failure to
/// spawn is an error here; a non-zero exit is reported in the result.
pub async fn run_git(args: &[&str], cwd: &Path) -> Result<CommandResult> {
    debug!(?args, cwd = %cwd.display(), "spawning git");

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    Ok(CommandResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run `git` and require a zero exit. A non-zero exit is a normal,
/// reportable failure carrying the trimmed stderr as its detail.
pub async fn git_expect(args: &[&str], cwd: &Path) -> Result<CommandResult> {
    let result = run_git(args, cwd).await?;
    if result.exit_code != 0 {
        return Err(classify_failure(&result.stderr));
    }
    Ok(result)
}

/// Map a git failure onto the service error taxonomy. git reports
/// everything as prose on stderr; the common not-found and collision shapes
/// get structured statuses, the rest passes through verbatim.
pub(crate) fn classify_failure(stderr: &str) -> AppError {
    let detail = error_detail(stderr);
    let lower = detail.to_ascii_lowercase();

    const NOT_FOUND: &[&str] = &[
        "unknown revision",
        "bad revision",
        "not a valid object name",
        "does not exist",
        "did not match any file",
        "no such path",
    ];

    if NOT_FOUND.iter().any(|pat| lower.contains(pat)) {
        AppError::NotFound(detail)
    } else if lower.contains("already exists") {
        AppError::AlreadyExists(detail)
    } else {
        AppError::Tool(detail)
    }
}

fn error_detail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "git exited with a non-zero status".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_missing_revision_as_not_found() {
        let err = classify_failure("fatal: bad revision 'nope'\n");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn classifies_collision_as_already_exists() {
        let err = classify_failure("fatal: a branch named 'dev' already exists\n");
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn passes_other_failures_through() {
        let err = classify_failure("error: something odd\n");
        match err {
            AppError::Tool(detail) => assert_eq!(detail, "error: something odd"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_stderr_gets_a_generic_detail() {
        let err = classify_failure("  \n");
        match err {
            AppError::Tool(detail) => assert!(detail.contains("non-zero")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
