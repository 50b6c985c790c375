//! Output parsers for the git command families.
//!
//! Each parser is a pure function from raw text to typed records, tied to
//! one fixed, explicitly-requested output format. The subprocess side and
//! the parsing side share the format constants below, so changing a format
//! is a one-place edit.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::warn;

use crate::models::{
    BranchInfo, ChangeAction, CommitCreated, CommitRecord, FileChange, RemoteInfo, TreeEntry,
    TreeKind,
};

/// Record separator emitted in front of every commit (`%x01`).
const RECORD_START: char = '\u{1}';
/// Marker closing the free-form message body (`%x02`).
const MESSAGE_END: char = '\u{2}';

/// Pretty format for `git log` and `git show`. The control-character
/// sentinels make record and message boundaries unambiguous no matter what
/// a commit message contains; blank-line heuristics are never used.
///
/// Layout per record: `\x01<sha1> <parents…>\n<author>\n<author date>\n`
/// `<committer>\n<commit date>\n<message>\x02[name-status lines]`.
pub const LOG_FORMAT: &str = "format:%x01%H %P%n%an <%ae>%n%aI%n%cn <%ce>%n%cI%n%B%x02";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed commit record: {0}")]
    Commit(String),
    #[error("malformed tree listing line: {0}")]
    Tree(String),
    #[error("malformed commit summary: {0}")]
    CommitSummary(String),
}

/// Parse the output of `git log --pretty=LOG_FORMAT` into commit records,
/// in the order git reported them.
pub fn parse_log(raw: &str) -> Result<Vec<CommitRecord>, ParseError> {
    raw.split(RECORD_START)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(parse_record)
        .collect()
}

/// Parse the output of `git show --pretty=LOG_FORMAT` for a single commit.
pub fn parse_commit_show(raw: &str) -> Result<CommitRecord, ParseError> {
    let mut records = parse_log(raw)?;
    if records.len() != 1 {
        return Err(ParseError::Commit(format!(
            "expected one commit record, found {}",
            records.len()
        )));
    }
    Ok(records.remove(0))
}

fn parse_record(chunk: &str) -> Result<CommitRecord, ParseError> {
    let (head, tail) = chunk
        .split_once(MESSAGE_END)
        .ok_or_else(|| ParseError::Commit("missing message terminator".to_string()))?;

    let mut fields = head.splitn(6, '\n');
    let hashes = fields.next().unwrap_or_default();
    let author = field(fields.next(), "author")?;
    let author_date = field(fields.next(), "author date")?;
    let committer = field(fields.next(), "committer")?;
    let commit_date = field(fields.next(), "commit date")?;
    let message = field(fields.next(), "message")?;

    let mut hashes = hashes.split_whitespace();
    let sha1 = hashes
        .next()
        .filter(|h| h.len() >= 40 && h.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| ParseError::Commit(format!("bad hash line: {}", first_line(head))))?
        .to_string();
    // Zero parents is a root commit, not an error.
    let parents: Vec<String> = hashes.map(str::to_string).collect();

    Ok(CommitRecord {
        is_merge: parents.len() > 1,
        sha1,
        parents,
        author: author.to_string(),
        author_date: parse_date(author_date)?,
        committer: committer.to_string(),
        commit_date: parse_date(commit_date)?,
        // `%B` keeps embedded newlines verbatim; only the trailing newline
        // git appends is stripped.
        message: message.trim_end_matches('\n').to_string(),
        files: parse_name_status(tail)?,
    })
}

fn field<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, ParseError> {
    value.ok_or_else(|| ParseError::Commit(format!("missing {what}")))
}

fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map_err(|err| ParseError::Commit(format!("bad date `{value}`: {err}")))
}

/// Parse the `--name-status` block trailing a commit record. Statuses map
/// to added/removed/changed; rename and copy lines fold to `changed` with
/// the destination path.
fn parse_name_status(tail: &str) -> Result<Vec<FileChange>, ParseError> {
    let mut files = Vec::new();
    for line in tail.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        let mut parts = line.split('\t');
        let status = parts.next().unwrap_or_default();
        let path = parts
            .next_back()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ParseError::Commit(format!("bad name-status line: {line}")))?;

        let action = match status.as_bytes().first() {
            Some(b'A') => ChangeAction::Added,
            Some(b'D') => ChangeAction::Removed,
            Some(_) => ChangeAction::Changed,
            None => return Err(ParseError::Commit(format!("bad name-status line: {line}"))),
        };

        files.push(FileChange {
            action,
            path: path.to_string(),
        });
    }
    Ok(files)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Fold the flat recursive listing of `ls-tree -t -r` into a hierarchy.
///
/// Returns `None` for empty input: the queried path does not exist at the
/// given revision. An empty directory still gets its own tree line, so it
/// folds to a node with zero contents instead of disappearing.
pub fn parse_ls_tree(raw: &str) -> Result<Option<Vec<TreeEntry>>, ParseError> {
    let mut root: Vec<TreeEntry> = Vec::new();
    let mut seen_any = false;

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let (meta, path) = line
            .split_once('\t')
            .ok_or_else(|| ParseError::Tree(line.to_string()))?;
        let mut meta = meta.split_whitespace();
        let (Some(mode), Some(kind), Some(sha1)) = (meta.next(), meta.next(), meta.next()) else {
            return Err(ParseError::Tree(line.to_string()));
        };

        let kind = match kind {
            "blob" => TreeKind::Blob,
            "tree" => TreeKind::Tree,
            other => {
                warn!(kind = other, path, "skipping unsupported tree entry");
                continue;
            }
        };

        seen_any = true;
        let segments: Vec<&str> = path.split('/').collect();
        insert_entry(&mut root, &segments, mode, sha1, kind)?;
    }

    Ok(if seen_any { Some(root) } else { None })
}

fn insert_entry(
    level: &mut Vec<TreeEntry>,
    segments: &[&str],
    mode: &str,
    sha1: &str,
    kind: TreeKind,
) -> Result<(), ParseError> {
    let Some((first, rest)) = segments.split_first() else {
        return Err(ParseError::Tree("empty path".to_string()));
    };
    let first = *first;

    if rest.is_empty() {
        // Final segment. A tree may already be present as a placeholder
        // created while attaching a deeper entry; fill it in rather than
        // duplicating the node.
        if kind == TreeKind::Tree
            && let Some(existing) = level
                .iter_mut()
                .find(|e| e.name == first && e.kind == TreeKind::Tree)
        {
            existing.mode = mode.to_string();
            existing.sha1 = sha1.to_string();
            return Ok(());
        }
        level.push(TreeEntry {
            name: first.to_string(),
            mode: mode.to_string(),
            sha1: sha1.to_string(),
            kind,
            contents: match kind {
                TreeKind::Tree => Some(Vec::new()),
                TreeKind::Blob => None,
            },
        });
        return Ok(());
    }

    // Intermediate segment: descend, creating a placeholder tree when the
    // listing starts below the repository root and never names the ancestor.
    let idx = match level
        .iter()
        .position(|e| e.name == first && e.kind == TreeKind::Tree)
    {
        Some(idx) => idx,
        None => {
            level.push(TreeEntry {
                name: first.to_string(),
                mode: "040000".to_string(),
                sha1: String::new(),
                kind: TreeKind::Tree,
                contents: Some(Vec::new()),
            });
            level.len() - 1
        }
    };

    let contents = level[idx].contents.get_or_insert_with(Vec::new);
    insert_entry(contents, rest, mode, sha1, kind)
}

/// Parse `git branch --list` output. The two-character prefix decides the
/// current flag; a repository in detached state marks nothing current.
/// Malformed lines are skipped with a warning, not fatal.
pub fn parse_branches(raw: &str) -> Vec<BranchInfo> {
    let mut branches = Vec::new();
    for line in raw.lines().filter(|l| !l.is_empty()) {
        let (current, name) = if let Some(rest) = line.strip_prefix("* ") {
            (true, rest)
        } else if let Some(rest) = line.strip_prefix("  ") {
            (false, rest)
        } else {
            warn!(line, "skipping malformed branch line");
            continue;
        };

        let name = name.trim_end();
        if name.starts_with('(') {
            // `* (HEAD detached at …)` is state, not a branch.
            continue;
        }
        branches.push(BranchInfo {
            name: name.to_string(),
            current,
        });
    }
    branches
}

/// Parse `git config --get-all` output: one verbatim value per line.
/// Empty output is an empty sequence, not an error.
pub fn parse_config(raw: &str) -> Vec<String> {
    raw.lines().map(str::to_string).collect()
}

/// Parse `git remote -v` output, deduplicating fetch/push lines by name.
/// When the two URLs differ, the fetch URL wins; first-seen name order is
/// preserved.
pub fn parse_remotes(raw: &str) -> Vec<RemoteInfo> {
    let mut remotes: Vec<RemoteInfo> = Vec::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            warn!(line, "skipping malformed remote line");
            continue;
        };
        let direction = parts.next().unwrap_or_default();

        match remotes.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                if direction == "(fetch)" {
                    existing.url = url.to_string();
                }
            }
            None => remotes.push(RemoteInfo {
                name: name.to_string(),
                url: url.to_string(),
            }),
        }
    }
    remotes
}

/// Parse the porcelain summary `git commit` prints on success:
/// `[branch sha1] title`, with an optional `(root-commit)` marker.
pub fn parse_commit_summary(raw: &str) -> Result<CommitCreated, ParseError> {
    let line = raw
        .lines()
        .find(|l| l.starts_with('['))
        .ok_or_else(|| ParseError::CommitSummary(first_line(raw).to_string()))?;
    let (head, title) = line
        .split_once(']')
        .ok_or_else(|| ParseError::CommitSummary(line.to_string()))?;

    let mut tokens: Vec<&str> = head
        .trim_start_matches('[')
        .split_whitespace()
        .filter(|t| !t.starts_with('('))
        .collect();
    let sha1 = tokens
        .pop()
        .ok_or_else(|| ParseError::CommitSummary(line.to_string()))?;
    if tokens.is_empty() {
        return Err(ParseError::CommitSummary(line.to_string()));
    }

    Ok(CommitCreated {
        branch: tokens.join(" "),
        sha1: sha1.to_string(),
        title: title.trim().to_string(),
    })
}
