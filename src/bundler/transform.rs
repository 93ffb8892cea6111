//! Per-include transform: compile if needed, then minify.
//!
//! Every derived file gets its modification time pinned to the newest of
//! its inputs (the source plus its `@import` chain). An output is stale when
//! it is missing or older than that time, so an unchanged tree costs only
//! `stat` calls.

use std::iter;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::anyhow;

use super::Bundler;
use super::context::{BuildContext, IncludeId};
use crate::classify::FileKind;
use crate::css::file_imports;
use crate::error::{BundleError, Result};
use crate::freshness::{is_stale, latest_mtime, mtime, pin_mtime};
use crate::manifest::compiled_path;
use crate::debug;
use crate::toolchain::Toolchain;

impl<T: Toolchain> Bundler<T> {
    pub(super) fn transform_include(&self, ctx: &mut BuildContext, id: IncludeId) -> Result<()> {
        let state = &ctx.includes[id];
        if state.transformed {
            return Ok(());
        }
        let source = state.source.clone();
        let output = state.output.clone();

        if !source.is_file() {
            return Err(BundleError::not_found(source));
        }
        let kind = FileKind::of(&source);

        let imports = match kind {
            Some(k) if k.has_imports() => {
                file_imports(&source, |_| {}).map_err(|e| BundleError::io(&source, e))?
            }
            _ => Vec::new(),
        };
        let inputs = iter::once(source.as_path()).chain(imports.iter().map(PathBuf::as_path));
        let input_max = latest_mtime(inputs)
            .map_err(|e| BundleError::io(&source, e))?
            .ok_or_else(|| BundleError::not_found(&source))?;

        let compiled = match kind.filter(|k| k.needs_compile()) {
            Some(kind) => {
                let sibling = compiled_path(&source).ok_or_else(|| unsupported(&source))?;
                self.compile(ctx, kind, &source, &sibling, input_max)?;
                sibling
            }
            None => source.clone(),
        };

        let output = output.ok_or_else(|| unsupported(&source))?;
        if ctx.key(&output) == ctx.key(&compiled) {
            debug!("include"; "{} is already minified", source.display());
        } else {
            let compiled_time = mtime(&compiled).map_err(|e| BundleError::io(&compiled, e))?;
            let threshold = compiled_time.max(input_max);
            if is_stale(&output, threshold) {
                debug!("include"; "{} is out-of-date", output.display());
                let result = match FileKind::of(&compiled) {
                    Some(FileKind::Css) => self.toolchain.minify_css(&compiled, &output),
                    Some(FileKind::JavaScript) => self.toolchain.minify_js(&compiled, &output),
                    _ => return Err(unsupported(&compiled)),
                };
                result.map_err(|e| BundleError::transform(&source, e))?;
                pin_mtime(&output, threshold).map_err(|e| BundleError::io(&output, e))?;
                debug!("minify"; "{} updated", output.display());
                ctx.record_written(&output);
            } else {
                debug!("include"; "{} is up-to-date", output.display());
            }
        }

        ctx.includes[id].transformed = true;
        Ok(())
    }

    /// Regenerate the compiled sibling of a LESS or template source if stale.
    fn compile(
        &self,
        ctx: &mut BuildContext,
        kind: FileKind,
        source: &Path,
        sibling: &Path,
        input_max: SystemTime,
    ) -> Result<()> {
        if !is_stale(sibling, input_max) {
            debug!("include"; "{} is up-to-date", sibling.display());
            return Ok(());
        }

        debug!("include"; "{} is out-of-date", sibling.display());
        let result = match kind {
            FileKind::Less => self.toolchain.compile_less(source, sibling),
            FileKind::JsTemplate => self.toolchain.compile_template(source, sibling),
            FileKind::Css | FileKind::JavaScript => return Err(unsupported(source)),
        };
        result.map_err(|e| BundleError::transform(source, e))?;

        pin_mtime(sibling, input_max).map_err(|e| BundleError::io(sibling, e))?;
        debug!("compile"; "{} updated", sibling.display());
        ctx.record_written(sibling);
        Ok(())
    }
}

fn unsupported(path: &Path) -> BundleError {
    BundleError::transform(path, anyhow!("unsupported file type"))
}
