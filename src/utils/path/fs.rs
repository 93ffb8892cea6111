//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - absolute, lexically cleaned paths (no filesystem access)
//! - `resolve_path` - resolve a manifest/css relative path against a directory
//! - `manifest_path` - accept both `/` and `\` separators from manifests

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Relative paths are joined with the current directory, then `.` and `..`
/// components are folded lexically. Symlinks are left alone and the path does
/// not need to exist, which keeps resolution of not-yet-built outputs stable.
///
/// # Example
/// ```ignore
/// let abs = normalize_path(Path::new("./css/../css/site.css"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` on a root is a no-op, matching `/..` == `/`
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against `base_dir` unless it is already absolute.
///
/// Always returns a normalized absolute path.
///
/// # Example
/// ```ignore
/// // include "css/site.css" declared in /proj/site.css.bundle
/// let resolved = resolve_path(Path::new("css/site.css"), Path::new("/proj"));
/// assert_eq!(resolved, PathBuf::from("/proj/css/site.css"));
/// ```
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base_dir.join(path))
    }
}

/// Turn a path written in a manifest into a native path.
///
/// Manifests written on Windows use `\`; on other platforms those are
/// separators too, not filename characters.
pub fn manifest_path(raw: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('\\', "/"))
    }
}

/// Parent directory of a normalized file path.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
