//! Error types for manifest loading and bundling.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = BundleError> = std::result::Result<T, E>;

// ============================================================================
// BundleError
// ============================================================================

/// Every way a resolve or build can fail.
///
/// Each variant carries the path(s) involved. Nothing is retried.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("file not found: `{}`", .path.display())]
    NotFound { path: PathBuf },

    #[error("invalid manifest `{}`: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("manifest cycle: {}", join_paths(.chain, " -> "))]
    Cycle { chain: Vec<PathBuf> },

    #[error("failed to transform `{}`", .path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "failed to create bundle output `{}` from {}",
        .output.display(),
        join_paths(.inputs, ", ")
    )]
    Concatenation {
        output: PathBuf,
        inputs: Vec<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} manifest(s) failed:\n{}", .0.len(), join_errors(.0))]
    Aggregate(Vec<BundleError>),
}

impl BundleError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn transform(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Transform {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Map a read error to `NotFound` when the file is missing.
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::io(path, source)
        }
    }
}

fn join_paths(paths: &[PathBuf], sep: &str) -> String {
    paths
        .iter()
        .map(|p| format!("`{}`", p.display()))
        .collect::<Vec<_>>()
        .join(sep)
}

fn join_errors(errors: &[BundleError]) -> String {
    errors
        .iter()
        .map(|e| format!("- {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
