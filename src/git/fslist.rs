//! Recursive on-disk listing of a working tree.
//!
//! Deliberately not backed by git: this lists what is on disk right now,
//! committed or not, in a shape isomorphic to the committed-tree listing.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{FsEntry, FsKind};

/// Recursively list `dir`. Entries are sorted by name. Directories recurse;
/// anything else (regular files, symlinks, specials) is reported as a file
/// and never followed. Hidden entries, including `.git`, are omitted.
pub fn list_dir(dir: &Path) -> Result<Vec<FsEntry>> {
    let mut dirents: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    dirents.sort_by_key(|e| e.file_name());

    let mut entries = Vec::new();
    for dirent in dirents {
        let name = dirent.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        // file_type does not follow symlinks, so a link to a directory
        // stays a file here instead of creating a walk cycle.
        if dirent.file_type()?.is_dir() {
            entries.push(FsEntry {
                name,
                kind: FsKind::Dir,
                contents: Some(list_dir(&dirent.path())?),
            });
        } else {
            entries.push(FsEntry {
                name,
                kind: FsKind::File,
                contents: None,
            });
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_nested_directories_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("sub/inner")).unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("sub/inner/deep.txt"), "d").unwrap();
        fs::write(tmp.path().join(".hidden"), "h").unwrap();

        let entries = list_dir(tmp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);

        let sub = &entries[2];
        assert_eq!(sub.kind, FsKind::Dir);
        let inner = &sub.contents.as_ref().unwrap()[0];
        assert_eq!(inner.name, "inner");
        assert_eq!(inner.contents.as_ref().unwrap()[0].name, "deep.txt");
    }

    #[test]
    fn empty_directory_lists_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_dir(tmp.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_reported_as_files_and_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        fs::write(tmp.path().join("real/x.txt"), "x").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let entries = list_dir(tmp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, FsKind::File);
        assert!(link.contents.is_none());
    }
}
