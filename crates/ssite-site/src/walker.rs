//! Filesystem traversal shared by content, theme and archetype walks.

use std::fs;
use std::path::Path;

use crate::error::LoadError;

/// List every non-hidden file under `root` as `/`-separated relative paths.
///
/// Entries starting with `.` are skipped at every level, and symlinked
/// directories are never descended into. Within a directory,
/// files come before subdirectories and both are sorted by name, so the
/// result (the discovery order) is stable across platforms.
///
/// # Errors
///
/// Returns `LoadError::Io` if any directory cannot be read, and
/// `LoadError::NonUtf8Path` for names that are not valid UTF-8.
pub(crate) fn list_files(root: &Path) -> Result<Vec<String>, LoadError> {
    let mut files = Vec::new();
    list_dir(root, "", &mut files)?;
    Ok(files)
}

fn list_dir(dir: &Path, prefix: &str, files: &mut Vec<String>) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;

    let mut names = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let path = entry.path();
        let file_name = entry.file_name();
        if file_name.as_encoded_bytes().starts_with(b".") {
            continue;
        }
        let Some(name) = file_name.to_str().map(str::to_owned) else {
            return Err(LoadError::NonUtf8Path(path));
        };
        let file_type = entry.file_type().map_err(|e| LoadError::io(&path, e))?;
        if file_type.is_dir() {
            subdirs.push(name);
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "Skipping symlinked directory");
        } else {
            names.push(name);
        }
    }
    names.sort();
    subdirs.sort();

    let join = |name: &str| {
        if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}/{name}")
        }
    };

    files.extend(names.iter().map(|name| join(name)));
    for name in subdirs {
        list_dir(&dir.join(&name), &join(&name), files)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(root: &Path, relpath: &str) {
        let path = root.join(relpath);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_files_before_subdirs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for relpath in ["b.md", "a/z.md", "a/b/c.md", "c.txt", "a/a.md"] {
            touch(dir.path(), relpath);
        }
        assert_eq!(
            list_files(dir.path()).unwrap(),
            vec!["b.md", "c.txt", "a/a.md", "a/z.md", "a/b/c.md"]
        );
    }

    #[test]
    fn test_hidden_entries_skipped_at_every_level() {
        let dir = tempfile::tempdir().unwrap();
        for relpath in [".DS_Store", ".git/config", "blog/.hidden.md", "blog/post.md"] {
            touch(dir.path(), relpath);
        }
        assert_eq!(list_files(dir.path()).unwrap(), vec!["blog/post.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "blog/post.md");
        touch(dir.path(), "shared/logo.png");
        std::os::unix::fs::symlink("..", dir.path().join("blog/up")).unwrap();
        std::os::unix::fs::symlink("../shared/logo.png", dir.path().join("blog/logo.png")).unwrap();
        assert_eq!(
            list_files(dir.path()).unwrap(),
            vec!["blog/logo.png", "blog/post.md", "shared/logo.png"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_hidden_non_utf8_name_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b".\xff")), "").unwrap();
        touch(dir.path(), "post.md");
        assert_eq!(list_files(dir.path()).unwrap(), vec!["post.md"]);
    }

    #[test]
    fn test_empty_directories_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        assert!(list_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
