//! Security and safety checks for archive extraction.
//!
//! This module provides functions to validate archive entry paths and make sure
//! nothing is written outside the destination root (zip-slip).

use crate::error::SecurityError;
use std::path::{Component, Path, PathBuf};

/// Validates and normalizes an archive entry path to prevent security vulnerabilities.
///
/// This function performs the following checks:
/// - Rejects absolute paths
/// - Rejects paths containing ".." components (path traversal)
/// - Normalizes the path to remove redundant separators and "." components
/// - Validates UTF-8 encoding
///
/// The normalized path may be empty (e.g. for a `./` directory entry).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unzipper::safety::validate_entry_path;
///
/// // Valid relative path
/// let safe_path = validate_entry_path(Path::new("dir/file.txt")).unwrap();
/// assert_eq!(safe_path, Path::new("dir/file.txt"));
///
/// // Path traversal attempt - rejected
/// let result = validate_entry_path(Path::new("../../etc/passwd"));
/// assert!(result.is_err());
///
/// // Absolute path - rejected
/// let result = validate_entry_path(Path::new("/etc/passwd"));
/// assert!(result.is_err());
/// ```
pub fn validate_entry_path(path: &Path) -> Result<PathBuf, SecurityError> {
    if path.is_absolute() {
        return Err(SecurityError::AbsolutePath(path.display().to_string()));
    }

    let path_str = path.to_str().ok_or_else(|| {
        SecurityError::PathTraversal("Path contains invalid UTF-8 characters".to_string())
    })?;

    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => continue,
            Component::ParentDir => {
                return Err(SecurityError::PathTraversal(format!(
                    "Path contains '..' component: {}",
                    path_str
                )));
            }
            // Windows prefixes ("C:") and a root without prefix ("\foo")
            Component::RootDir | Component::Prefix(_) => {
                return Err(SecurityError::AbsolutePath(path_str.to_string()));
            }
        }
    }

    Ok(normalized)
}

/// Resolves the on-disk destination of an archive entry.
///
/// `root` must be the canonical destination root. The entry name is validated
/// with [`validate_entry_path`] and joined onto the root. The deepest part of
/// the resulting path that already exists is then canonicalized, so a symlink
/// planted inside the root (or left there by an earlier extraction) cannot
/// redirect the write elsewhere.
///
/// A directory entry that normalizes to nothing resolves to the root itself; a
/// file entry that does so is rejected.
pub fn resolve_destination(
    root: &Path,
    entry_name: &str,
    is_directory: bool,
) -> Result<PathBuf, SecurityError> {
    let relative = validate_entry_path(Path::new(entry_name))?;

    if relative.as_os_str().is_empty() {
        if is_directory {
            return Ok(root.to_path_buf());
        }
        return Err(SecurityError::EmptyPath(entry_name.to_string()));
    }

    let target = root.join(&relative);
    ensure_within_root(root, &target, entry_name)?;
    Ok(target)
}

/// Checks that the existing portion of `target` resolves inside `root`.
fn ensure_within_root(root: &Path, target: &Path, entry_name: &str) -> Result<(), SecurityError> {
    let outside = || SecurityError::OutsideRoot(entry_name.to_string());

    let mut ancestor = target;
    loop {
        // symlink_metadata so that dangling links are seen as existing
        if ancestor.symlink_metadata().is_ok() {
            // A dangling link fails to canonicalize; following it on create
            // could land anywhere.
            let resolved = ancestor.canonicalize().map_err(|_| outside())?;
            return if resolved.starts_with(root) {
                Ok(())
            } else {
                Err(outside())
            };
        }
        ancestor = ancestor.parent().ok_or_else(outside)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn canonical_root() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    #[test]
    fn test_validate_entry_path_valid() {
        let result = validate_entry_path(Path::new("file.txt"));
        assert_eq!(result.unwrap(), Path::new("file.txt"));

        let result = validate_entry_path(Path::new("dir/subdir/file.txt"));
        assert_eq!(result.unwrap(), Path::new("dir/subdir/file.txt"));

        let result = validate_entry_path(Path::new("./dir/file.txt"));
        assert_eq!(result.unwrap(), Path::new("dir/file.txt"));
    }

    #[test]
    fn test_validate_entry_path_absolute() {
        let result = validate_entry_path(Path::new("/etc/passwd"));
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::AbsolutePath(_)
        ));

        let result = validate_entry_path(Path::new("/tmp/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_entry_path_traversal() {
        let result = validate_entry_path(Path::new("../etc/passwd"));
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::PathTraversal(_)
        ));

        assert!(validate_entry_path(Path::new("../../etc/passwd")).is_err());
        assert!(validate_entry_path(Path::new("dir/../etc/passwd")).is_err());
        assert!(validate_entry_path(Path::new("dir/..")).is_err());
        assert!(validate_entry_path(Path::new("./../../etc/passwd")).is_err());
        assert!(validate_entry_path(Path::new("../../../../../../../etc/passwd")).is_err());
    }

    #[test]
    fn test_validate_entry_path_edge_cases() {
        let result = validate_entry_path(Path::new("dir//file.txt"));
        assert_eq!(result.unwrap(), Path::new("dir/file.txt"));

        let result = validate_entry_path(Path::new("./././file.txt"));
        assert_eq!(result.unwrap(), Path::new("file.txt"));

        // Normalizes to nothing; callers decide what that means
        let result = validate_entry_path(Path::new("./"));
        assert_eq!(result.unwrap(), PathBuf::new());

        let result = validate_entry_path(Path::new("dir/subdir/"));
        assert_eq!(result.unwrap(), Path::new("dir/subdir"));
    }

    #[test]
    fn test_validate_entry_path_unicode() {
        let result = validate_entry_path(Path::new("日本語/ファイル.txt"));
        assert_eq!(result.unwrap(), Path::new("日本語/ファイル.txt"));

        let result = validate_entry_path(Path::new("日本語/../etc/passwd"));
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::PathTraversal(_)
        ));
    }

    #[test]
    fn test_resolve_destination_joins_under_root() {
        let (_dir, root) = canonical_root();

        let resolved = resolve_destination(&root, "a/b/c.txt", false).unwrap();
        assert_eq!(resolved, root.join("a/b/c.txt"));

        let resolved = resolve_destination(&root, "a/", true).unwrap();
        assert_eq!(resolved, root.join("a"));
    }

    #[test]
    fn test_resolve_destination_empty_names() {
        let (_dir, root) = canonical_root();

        assert_eq!(resolve_destination(&root, "./", true).unwrap(), root);
        assert!(matches!(
            resolve_destination(&root, "./", false).unwrap_err(),
            SecurityError::EmptyPath(_)
        ));
    }

    #[test]
    fn test_resolve_destination_rejects_traversal() {
        let (_dir, root) = canonical_root();

        let result = resolve_destination(&root, "../../etc/passwd", false);
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::PathTraversal(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_destination_rejects_symlink_escape() {
        let (_dir, root) = canonical_root();
        let outside = TempDir::new().unwrap();

        std::os::unix::fs::symlink(outside.path(), root.join("link")).unwrap();

        let result = resolve_destination(&root, "link/evil.txt", false);
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::OutsideRoot(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_destination_rejects_dangling_symlink() {
        let (_dir, root) = canonical_root();

        std::os::unix::fs::symlink("/nonexistent/target", root.join("file.txt")).unwrap();

        let result = resolve_destination(&root, "file.txt", false);
        assert!(matches!(
            result.unwrap_err(),
            SecurityError::OutsideRoot(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_destination_allows_symlink_inside_root() {
        let (_dir, root) = canonical_root();
        std::fs::create_dir(root.join("real")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();

        let resolved = resolve_destination(&root, "alias/file.txt", false).unwrap();
        assert_eq!(resolved, root.join("alias/file.txt"));
    }
}
