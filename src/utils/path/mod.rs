//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`)
//! - [`case`]: Case-aware comparison keys (`PathCase`, `PathKey`)

pub mod case;
pub mod fs;

pub use case::{PathCase, PathKey};
pub use fs::{manifest_path, normalize_path, parent_dir, resolve_path};
