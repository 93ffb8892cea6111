//! Bundle assembly.
//!
//! Include outputs are appended in flattened order. CSS gets its residual
//! `@import`s inlined and its relative paths rebased onto the bundle's own
//! directory, so `url(img/a.png)` keeps pointing at the same file. Other
//! includes are copied byte for byte, minus a UTF-8 byte-order mark.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::context::{BuildContext, BundleId};
use super::{BuildEvents, Bundler};
use crate::classify::is_css;
use crate::css::{expanded_css, rewrite_relative_paths};
use crate::debug;
use crate::error::{BundleError, Result};
use crate::freshness::{is_stale, latest_mtime, pin_mtime};
use crate::toolchain::Toolchain;
use crate::utils::path::parent_dir;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl<T: Toolchain> Bundler<T> {
    /// Concatenate the (already transformed) includes of `id` into `output`.
    pub(super) fn transform_bundle(
        &self,
        ctx: &mut BuildContext,
        id: BundleId,
        output: &Path,
        events: &mut dyn BuildEvents,
    ) -> Result<()> {
        let bundle = &ctx.bundles[id];
        if bundle.transformed {
            return Ok(());
        }

        let inputs: Vec<PathBuf> = bundle
            .includes
            .iter()
            .filter_map(|&include| ctx.includes[include].output.clone())
            .collect();

        if inputs.is_empty() {
            debug!("bundle"; "{} has no includes", bundle.manifest.path.display());
            ctx.bundles[id].transformed = true;
            return Ok(());
        }

        let input_max = latest_mtime(inputs.iter().map(PathBuf::as_path))
            .map_err(|e| BundleError::io(output, e))?
            .ok_or_else(|| BundleError::not_found(output))?;

        if is_stale(output, input_max) {
            debug!("bundle"; "{} is out-of-date", output.display());
            write_bundle(output, &inputs, events).map_err(|source| BundleError::Concatenation {
                output: output.to_path_buf(),
                inputs: inputs.clone(),
                source,
            })?;
            pin_mtime(output, input_max).map_err(|e| BundleError::io(output, e))?;
            debug!("bundle"; "{} updated", output.display());
            ctx.record_written(output);
        } else {
            debug!("bundle"; "{} is up-to-date", output.display());
        }

        ctx.bundles[id].transformed = true;
        Ok(())
    }
}

fn write_bundle(output: &Path, inputs: &[PathBuf], events: &mut dyn BuildEvents) -> io::Result<()> {
    let target_dir = parent_dir(output);
    fs::create_dir_all(&target_dir)?;

    // The output is only ever replaced by a complete bundle
    let staged = staging_path(output);
    let result = append_all(&staged, output, &target_dir, inputs, events)
        .and_then(|()| fs::rename(&staged, output));
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn append_all(
    staged: &Path,
    output: &Path,
    target_dir: &Path,
    inputs: &[PathBuf],
    events: &mut dyn BuildEvents,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(staged)?);

    for input in inputs {
        let bytes = if is_css(input) {
            let mut missing = Vec::new();
            let css = expanded_css(input, |import| missing.push(import.clone()))?;
            for import in &missing {
                events.missing_import(input, import);
            }
            rewrite_relative_paths(&css, &parent_dir(input), target_dir)?.into_bytes()
        } else {
            let bytes = fs::read(input)?;
            match bytes.strip_prefix(UTF8_BOM) {
                Some(rest) => rest.to_vec(),
                None => bytes,
            }
        };

        writer.write_all(&bytes)?;
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            writer.write_all(b"\n")?;
        }
        events.file_appended(output, input);
    }
    writer.flush()
}

/// `dir/.site.min.css.partial` for `dir/site.min.css`.
fn staging_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(output.file_name().unwrap_or_default());
    name.push(".partial");
    output.with_file_name(name)
}
