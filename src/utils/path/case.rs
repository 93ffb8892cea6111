//! Path comparison keys.
//!
//! Include dedup and bundle memoization key paths through [`PathCase`], so
//! `Site.css` and `site.css` collapse on case-insensitive filesystems.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// How paths are compared when deduplicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCase {
    /// Case-insensitive on Windows and macOS, sensitive elsewhere.
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

impl PathCase {
    /// Whether comparison ignores case once `Auto` is resolved.
    pub const fn is_insensitive(self) -> bool {
        match self {
            Self::Auto => cfg!(any(windows, target_os = "macos")),
            Self::Sensitive => false,
            Self::Insensitive => true,
        }
    }

    /// Comparison key for a (normalized) path.
    pub fn key(self, path: &Path) -> PathKey {
        let raw = path.to_string_lossy();
        if self.is_insensitive() {
            PathKey(raw.to_lowercase())
        } else {
            PathKey(raw.into_owned())
        }
    }
}

/// Hashable path identity under a [`PathCase`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey(String);
