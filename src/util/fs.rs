//! Filesystem utilities.
//!
//! These return `io::Result` so callers can wrap failures in their own
//! error types.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove a directory and everything in it, then recreate it empty.
///
/// A missing directory is not an error. Any failure to delete is reported,
/// so the caller never continues with a half-cleared tree.
pub fn clear_dir(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)?,
        Ok(_) => fs::remove_file(path)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(path)
}

/// Make `path` absolute and lexically drop `.` and `..` components.
///
/// Symlinks are not followed.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    Ok(normalized)
}

/// Like [`normalize_path`], but resolves symlinks in the part of the path
/// that exists. The rest is appended unchanged.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let normalized = normalize_path(path)?;

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        match fs::canonicalize(existing) {
            Ok(mut resolved) => {
                resolved.extend(missing.iter().rev());
                return Ok(resolved);
            }
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return Ok(normalized),
            },
        }
    }
}

/// Remove a file, treating a missing file as success.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clear_dir_removes_contents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build");
        fs::create_dir_all(dir.join("CMakeFiles/nested")).unwrap();
        fs::write(dir.join("CMakeCache.txt"), "CMAKE_GENERATOR:INTERNAL=Ninja").unwrap();
        fs::write(dir.join("CMakeFiles/nested/obj.o"), "obj").unwrap();

        clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_dir_creates_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/build");

        clear_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_clear_dir_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build");
        fs::write(&path, "not a directory").unwrap();

        clear_dir(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_remove_file_if_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("CMakeCache.txt");

        remove_file_if_exists(&file).unwrap();

        fs::write(&file, "cache").unwrap();
        remove_file_if_exists(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_normalize_path_drops_dot_components() {
        let tmp = TempDir::new().unwrap();
        let base = normalize_path(tmp.path()).unwrap();

        assert_eq!(normalize_path(&tmp.path().join(".")).unwrap(), base);
        assert_eq!(
            normalize_path(&tmp.path().join("a/./b/../c")).unwrap(),
            base.join("a/c")
        );
        assert!(normalize_path(Path::new("build")).unwrap().is_absolute());
    }

    #[test]
    fn test_resolve_path_keeps_missing_tail() {
        let tmp = TempDir::new().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();

        assert_eq!(resolve_path(tmp.path()).unwrap(), root);
        assert_eq!(
            resolve_path(&tmp.path().join("not/yet/there")).unwrap(),
            root.join("not/yet/there")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_follows_symlinks() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        std::os::unix::fs::symlink(&real, tmp.path().join("link")).unwrap();

        assert_eq!(
            resolve_path(&tmp.path().join("link/build")).unwrap(),
            fs::canonicalize(&real).unwrap().join("build")
        );
    }

    #[test]
    fn test_ensure_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("x/y");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
