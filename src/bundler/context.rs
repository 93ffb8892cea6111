//! Run-scoped build state.
//!
//! One `BuildContext` lives for exactly one `resolve`/`build`/`build_all`
//! call. Includes and bundles are stored in arenas and addressed by index;
//! the index maps key them by [`PathKey`] so the same file reached twice
//! (directly, through a nested bundle, or with different letter case on a
//! case-insensitive system) shares one state.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::BuildSummary;
use crate::manifest::Manifest;
use crate::utils::path::{PathCase, PathKey};

pub(crate) type IncludeId = usize;
pub(crate) type BundleId = usize;

#[derive(Debug)]
pub(crate) struct IncludeState {
    /// Absolute source path.
    pub source: PathBuf,
    /// Absolute output path; `None` for unsupported kinds without an
    /// explicit `<OutputFile>`.
    pub output: Option<PathBuf>,
    pub transformed: bool,
}

#[derive(Debug)]
pub(crate) struct BundleState {
    pub manifest: Manifest,
    /// Flattened, deduplicated includes in declaration order.
    pub includes: Vec<IncludeId>,
    pub transformed: bool,
}

#[derive(Debug)]
pub(crate) struct BuildContext {
    pub case: PathCase,
    pub includes: Vec<IncludeState>,
    include_index: FxHashMap<PathKey, IncludeId>,
    pub bundles: Vec<BundleState>,
    pub(super) bundle_index: FxHashMap<PathKey, BundleId>,
    /// Manifests currently being flattened, outermost first.
    pub(super) stack: Vec<PathBuf>,
    pub summary: BuildSummary,
}

impl BuildContext {
    pub fn new(case: PathCase) -> Self {
        Self {
            case,
            includes: Vec::new(),
            include_index: FxHashMap::default(),
            bundles: Vec::new(),
            bundle_index: FxHashMap::default(),
            stack: Vec::new(),
            summary: BuildSummary::default(),
        }
    }

    pub fn key(&self, path: &Path) -> PathKey {
        self.case.key(path)
    }

    /// The state for `source`, created on first sight.
    ///
    /// The first occurrence fixes the output path; later declarations of the
    /// same source with a different `<OutputFile>` reuse it.
    pub fn intern_include(&mut self, source: PathBuf, output: Option<PathBuf>) -> IncludeId {
        let key = self.key(&source);
        if let Some(&id) = self.include_index.get(&key) {
            return id;
        }
        let id = self.includes.len();
        self.includes.push(IncludeState {
            source,
            output,
            transformed: false,
        });
        self.include_index.insert(key, id);
        id
    }

    pub fn bundle_sources(&self, bundle: BundleId) -> Vec<PathBuf> {
        self.bundles[bundle]
            .includes
            .iter()
            .map(|&id| self.includes[id].source.clone())
            .collect()
    }

    pub fn record_written(&mut self, path: &Path) {
        self.summary.written.push(path.to_path_buf());
    }
}
