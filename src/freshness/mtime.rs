//! Mtime-based freshness detection for generated files.
//!
//! Every derived file (compiled sibling, minified output, bundle output) has
//! its modification time *pinned* to the newest modification time among its
//! inputs, not to the time it was written. A derived file is stale exactly
//! when it is missing or older than that newest input, so rebuilding over
//! unchanged inputs never touches anything.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Modification time of a file that must exist.
pub fn mtime(path: &Path) -> io::Result<SystemTime> {
    path.metadata()?.modified()
}

/// Newest modification time over `paths`.
///
/// Fails on the first path whose metadata cannot be read; returns `None` only
/// for an empty input.
pub fn latest_mtime<'a, I>(paths: I) -> io::Result<Option<SystemTime>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut latest = None;
    for path in paths {
        let time = mtime(path)?;
        latest = Some(latest.map_or(time, |l: SystemTime| l.max(time)));
    }
    Ok(latest)
}

/// Check if a derived file must be regenerated
///
/// Returns `true` if `output` is missing or strictly older than `input_time`.
pub fn is_stale(output: &Path, input_time: SystemTime) -> bool {
    get_mtime(output).is_none_or(|output_time| output_time < input_time)
}

/// Force the modification time of `path` to `time`.
pub fn pin_mtime(path: &Path, time: SystemTime) -> io::Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_pin_mtime() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.css");
        fs::write(&file, "a{}").unwrap();

        pin_mtime(&file, at(1_000_000)).unwrap();
        assert_eq!(get_mtime(&file), Some(at(1_000_000)));
        assert_eq!(fs::read_to_string(&file).unwrap(), "a{}");
    }

    #[test]
    fn test_is_stale() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.min.css");
        assert!(is_stale(&file, at(10)));

        fs::write(&file, "").unwrap();
        pin_mtime(&file, at(20)).unwrap();
        assert!(is_stale(&file, at(21)));
        assert!(!is_stale(&file, at(20)));
        assert!(!is_stale(&file, at(19)));
    }

    #[test]
    fn test_latest_mtime() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();
        pin_mtime(&a, at(50)).unwrap();
        pin_mtime(&b, at(70)).unwrap();

        let latest = latest_mtime([a.as_path(), b.as_path()]).unwrap();
        assert_eq!(latest, Some(at(70)));
        assert_eq!(latest_mtime(std::iter::empty()).unwrap(), None);
        assert!(latest_mtime([dir.path().join("missing").as_path()]).is_err());
    }
}
