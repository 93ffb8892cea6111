//! Freshness detection: pinned mtimes for every derived file.

pub mod mtime;

pub use mtime::{get_mtime, is_stale, latest_mtime, mtime, pin_mtime};
