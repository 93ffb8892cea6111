//! `frappe build`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;

use crate::bundler::{BuildEvents, Bundler};
use crate::css::CssImport;
use crate::toolchain::Toolchain;
use crate::{debug, log};

/// Reports engine events on the terminal.
#[derive(Debug, Default)]
pub struct LogEvents {
    pub missing_imports: usize,
}

impl BuildEvents for LogEvents {
    fn missing_import(&mut self, from_file: &Path, import: &CssImport) {
        self.missing_imports += 1;
        log!(
            "warning";
            "{}: missing import `{}` (from {}), left as is",
            from_file.display(),
            import.import_file,
            import.containing_file.display()
        );
    }

    fn file_appended(&mut self, output_file: &Path, input: &Path) {
        debug!("bundle"; "{} += {}", output_file.display(), input.display());
    }
}

/// Build every manifest and log what was written.
pub fn build_bundles<T: Toolchain>(bundler: &Bundler<T>, manifests: &[PathBuf]) -> Result<()> {
    let started = Instant::now();
    let mut events = LogEvents::default();

    let summary = bundler.build_all(manifests, &mut events)?;

    for path in &summary.written {
        log!("write"; "{}", path.display());
    }
    if summary.is_empty() {
        log!("bundle"; "{} up to date", plural_count(manifests.len(), "manifest"));
    } else {
        log!(
            "bundle";
            "wrote {} in {:.2?}",
            plural_count(summary.len(), "file"),
            started.elapsed()
        );
    }
    if events.missing_imports > 0 {
        log!("warning"; "{}", plural_count(events.missing_imports, "missing import"));
    }
    Ok(())
}

/// `1 file`, `2 files`.
fn plural_count(count: usize, noun: &str) -> String {
    let s = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{s}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "manifest"), "1 manifest");
        assert_eq!(plural_count(3, "missing import"), "3 missing imports");
    }
}
