//! Manifest graph flattening.
//!
//! ```text
//! A.bundle = [x.css, B.bundle, z.css]
//! B.bundle = [y.css, x.css]
//!
//! flatten(A) = [x.css, y.css, z.css]
//! ```
//!
//! Nested bundles are inlined where they are referenced; within one bundle
//! a file is kept at its first position only. Each manifest is loaded once
//! per run and its flattened list reused wherever it is referenced again.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use super::context::{BuildContext, BundleId, BundleState, IncludeId};
use crate::debug;
use crate::error::{BundleError, Result};
use crate::manifest::{Entry, Manifest};
use crate::utils::path::normalize_path;

impl BuildContext {
    /// Load and flatten the manifest at `path` and everything it nests.
    pub fn resolve_bundle(&mut self, path: &Path) -> Result<BundleId> {
        if path.as_os_str().is_empty() {
            return Err(BundleError::not_found(path));
        }
        let path = normalize_path(path);
        let key = self.key(&path);

        if self.stack.iter().any(|p| self.key(p) == key) {
            let mut chain = self.stack.clone();
            chain.push(path);
            return Err(BundleError::Cycle { chain });
        }
        if let Some(&id) = self.bundle_index.get(&key) {
            return Ok(id);
        }

        let manifest = Manifest::load(&path)?;
        debug!("resolve"; "{}", path.display());

        self.stack.push(path);
        let flattened = self.flatten(&manifest);
        self.stack.pop();
        let includes = flattened?;

        let id = self.bundles.len();
        self.bundles.push(BundleState {
            manifest,
            includes,
            transformed: false,
        });
        self.bundle_index.insert(key, id);
        Ok(id)
    }

    fn flatten(&mut self, manifest: &Manifest) -> Result<Vec<IncludeId>> {
        let dir = manifest.dir();
        let mut seen = FxHashSet::default();
        let mut includes = Vec::new();

        for entry in &manifest.entries {
            match entry {
                Entry::Include(include) => {
                    let id = self.intern_include(
                        include.source_path(&dir),
                        include.output_path(&dir),
                    );
                    if seen.insert(id) {
                        includes.push(id);
                    }
                }
                Entry::Bundle(nested) => {
                    let child = self.resolve_bundle(&nested.source_path(&dir))?;
                    for &id in &self.bundles[child].includes {
                        if seen.insert(id) {
                            includes.push(id);
                        }
                    }
                }
            }
        }
        Ok(includes)
    }

    /// Flattened source paths of the manifest at `path`.
    pub fn resolve_sources(&mut self, path: &Path) -> Result<Vec<PathBuf>> {
        let id = self.resolve_bundle(path)?;
        Ok(self.bundle_sources(id))
    }
}
