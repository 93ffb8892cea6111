//! Incremental bundle builds.
//!
//! # Pipeline
//!
//! ```text
//! site.css.bundle ─ load ─ flatten ─┬─ reset.css  ─────────── minify ─ reset.min.css ─┐
//!                                   ├─ theme.less ─ compile ─ minify ─ theme.min.css ─┼─ concat ─ site.min.css
//!                                   └─ grid.css   ─────────── minify ─ grid.min.css  ─┘
//! ```
//!
//! Every step is skipped when its output is newer than or as new as its
//! inputs. Derived files carry the modification time of their newest input,
//! never the wall-clock time of the build, so the tree itself is the cache.
//!
//! # Modules
//!
//! | Module      | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `context`   | Per-call arenas of include and bundle states     |
//! | `resolve`   | Manifest graph flattening and cycle detection    |
//! | `transform` | Compile and minify one include                   |
//! | `concat`    | Assemble a bundle output                         |

mod concat;
mod context;
mod resolve;
mod transform;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::classify::FileKind;
use crate::css::{CssImport, file_imports};
use crate::error::{BundleError, Result};
use crate::toolchain::Toolchain;
use crate::utils::path::PathCase;
use context::BuildContext;

// ============================================================================
// Options, events, summary
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundlerOptions {
    pub path_case: PathCase,
    /// `build_all`: attempt every manifest and return all failures together.
    pub keep_going: bool,
}

/// Progress notifications. All methods default to doing nothing.
pub trait BuildEvents {
    /// An `@import` in `from_file` names a file that does not exist. The
    /// statement is left in the bundle as written.
    fn missing_import(&mut self, _from_file: &Path, _import: &CssImport) {}

    /// `input` has been appended to the bundle output `output_file`.
    fn file_appended(&mut self, _output_file: &Path, _input: &Path) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl BuildEvents for NoEvents {}

/// Files written by one build call, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub written: Vec<PathBuf>,
}

impl BuildSummary {
    /// True when the build found everything up to date.
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }
}

// ============================================================================
// Bundler
// ============================================================================

/// Builds bundle manifests with an injected [`Toolchain`].
///
/// Holds no state between calls; each call starts from a fresh context, so
/// one instance can serve any number of builds.
#[derive(Debug, Clone)]
pub struct Bundler<T> {
    toolchain: T,
    options: BundlerOptions,
}

impl<T: Toolchain> Bundler<T> {
    pub fn new(toolchain: T, options: BundlerOptions) -> Self {
        Self { toolchain, options }
    }

    pub fn options(&self) -> &BundlerOptions {
        &self.options
    }

    fn context(&self) -> BuildContext {
        BuildContext::new(self.options.path_case)
    }

    /// Flattened, deduplicated source files of `manifest`, in declaration order.
    ///
    /// Reads manifests only; source files are not checked for existence.
    pub fn resolve(&self, manifest: &Path) -> Result<Vec<PathBuf>> {
        self.context().resolve_sources(manifest)
    }

    /// Distinct transitive `@import` files of every CSS/LESS include of
    /// `manifest`, in first-seen order. Includes that do not exist are skipped.
    pub fn import_files(&self, manifest: &Path) -> Result<Vec<PathBuf>> {
        let mut ctx = self.context();
        let sources = ctx.resolve_sources(manifest)?;

        let mut seen = FxHashSet::default();
        let mut imports = Vec::new();
        for source in sources {
            let has_imports = FileKind::of(&source).is_some_and(FileKind::has_imports);
            if !has_imports || !source.is_file() {
                continue;
            }
            let files = file_imports(&source, |_| {}).map_err(|e| BundleError::io(&source, e))?;
            for file in files {
                if seen.insert(ctx.key(&file)) {
                    imports.push(file);
                }
            }
        }
        Ok(imports)
    }

    /// Bring the outputs of `manifest` up to date.
    pub fn build(&self, manifest: &Path, events: &mut dyn BuildEvents) -> Result<BuildSummary> {
        let mut ctx = self.context();
        self.build_in(&mut ctx, manifest, events)?;
        Ok(ctx.summary)
    }

    /// Build several manifests sharing one context: an include referenced by
    /// more than one of them is transformed once.
    ///
    /// Stops at the first failure unless `keep_going` is set, in which case
    /// every manifest is attempted and the failures come back as
    /// [`BundleError::Aggregate`].
    pub fn build_all<P: AsRef<Path>>(
        &self,
        manifests: &[P],
        events: &mut dyn BuildEvents,
    ) -> Result<BuildSummary> {
        let mut ctx = self.context();
        let mut errors = Vec::new();

        for manifest in manifests {
            match self.build_in(&mut ctx, manifest.as_ref(), events) {
                Ok(()) => {}
                Err(err) if self.options.keep_going => errors.push(err),
                Err(err) => return Err(err),
            }
        }

        if errors.is_empty() {
            Ok(ctx.summary)
        } else {
            Err(BundleError::Aggregate(errors))
        }
    }

    fn build_in(&self, ctx: &mut BuildContext, manifest: &Path, events: &mut dyn BuildEvents) -> Result<()> {
        let id = ctx.resolve_bundle(manifest)?;
        let output = ctx.bundles[id].manifest.output_path()?;

        for include in ctx.bundles[id].includes.clone() {
            self.transform_include(ctx, include)?;
        }
        self.transform_bundle(ctx, id, &output, events)
    }
}
