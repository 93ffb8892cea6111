//! Bundle manifests: what goes into a bundle and where the results land.
//!
//! A manifest lists includes in order. An entry is either a source file
//! (`<Include>`) or another manifest (`<Bundle>`) whose own includes are
//! inlined at that point. Relative paths are relative to the manifest's
//! directory.
//!
//! # Output naming
//!
//! | Source          | Compiled sibling   | Output         |
//! |-----------------|--------------------|----------------|
//! | `a.css`         |                    | `a.min.css`    |
//! | `a.js`          |                    | `a.min.js`     |
//! | `a.less`        | `a.less.css`       | `a.min.css`    |
//! | `a.js.html`     | `a.js.html.js`     | `a.min.js`     |
//! | `a.min.css`     |                    | `a.min.css`    |
//! | `site.css.bundle` |                  | `site.min.css` |

mod xml;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{FileKind, is_minified};
use crate::error::{BundleError, Result};
use crate::utils::path::{manifest_path, normalize_path, parent_dir, resolve_path};

use xml::{BundleXml, Child};

/// `<name>.<css|js>.bundle`
static BUNDLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^(.+?)(\.(?:css|js))\.bundle$").unwrap());

// ============================================================================
// Model
// ============================================================================

/// One file entry, as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Include {
    pub file: String,
    pub output_file: Option<String>,
}

impl Include {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            output_file: None,
        }
    }

    pub fn with_output(mut self, output_file: impl Into<String>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    /// Absolute source path.
    pub fn source_path(&self, manifest_dir: &Path) -> PathBuf {
        resolve_path(&manifest_path(&self.file), manifest_dir)
    }

    /// Absolute output path, or `None` when the source is not a known kind
    /// and no explicit output is given.
    pub fn output_path(&self, manifest_dir: &Path) -> Option<PathBuf> {
        match &self.output_file {
            Some(output) => Some(resolve_path(&manifest_path(output), manifest_dir)),
            None => minified_path(&self.source_path(manifest_dir)),
        }
    }
}

/// A manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Include(Include),
    /// `file` names another manifest.
    Bundle(Include),
}

/// A loaded bundle manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Absolute path the manifest was loaded from; empty when parsed from text.
    pub path: PathBuf,
    pub output_file: Option<String>,
    pub entries: Vec<Entry>,
}

// ============================================================================
// Loading and saving
// ============================================================================

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(BundleError::not_found(path));
        }
        let path = normalize_path(path);
        let text = fs::read_to_string(&path).map_err(|e| BundleError::read(&path, e))?;

        let mut manifest = Self::from_xml(&text).map_err(|message| BundleError::Manifest {
            path: path.clone(),
            message,
        })?;
        manifest.path = path;
        Ok(manifest)
    }

    /// Parse manifest XML. The result has no `path`.
    pub fn from_xml(text: &str) -> std::result::Result<Self, String> {
        let parsed = xml::parse(text)?;

        let mut manifest = Self::default();
        for child in parsed.children {
            match child {
                Child::OutputFile(output) => {
                    manifest.output_file = Some(output).filter(|o| !o.trim().is_empty());
                }
                Child::Include(include) => manifest.entries.push(Entry::Include(include.into_include()?)),
                Child::Bundle(include) => manifest.entries.push(Entry::Bundle(include.into_include()?)),
            }
        }
        Ok(manifest)
    }

    pub fn to_xml(&self) -> std::result::Result<String, String> {
        let children = self
            .output_file
            .iter()
            .map(|output| Child::OutputFile(output.clone()))
            .chain(self.entries.iter().map(Child::from))
            .collect();
        xml::write(&BundleXml { children })
    }

    /// Write the manifest to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_xml().map_err(|message| BundleError::Manifest {
            path: path.to_path_buf(),
            message,
        })?;
        fs::write(path, text).map_err(|e| BundleError::io(path, e))
    }

    /// Directory relative entries resolve against.
    pub fn dir(&self) -> PathBuf {
        parent_dir(&self.path)
    }

    /// Where the concatenated bundle is written.
    pub fn output_path(&self) -> Result<PathBuf> {
        if self.path.as_os_str().is_empty() {
            return Err(BundleError::Argument(
                "manifest has no source path to derive its output from".to_owned(),
            ));
        }
        if let Some(output) = &self.output_file {
            return Ok(resolve_path(&manifest_path(output), &self.dir()));
        }

        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let caps = BUNDLE_NAME_RE.captures(name).ok_or_else(|| {
            BundleError::Argument(format!(
                "cannot derive an output name for `{}`: expected `*.css.bundle` or `*.js.bundle`, or an <OutputFile>",
                self.path.display()
            ))
        })?;
        Ok(self.dir().join(format!("{}.min{}", &caps[1], &caps[2])))
    }
}

// ============================================================================
// Output naming
// ============================================================================

/// Minified output for a source file, next to it.
///
/// Already-minified files are their own output.
pub fn minified_path(source: &Path) -> Option<PathBuf> {
    if is_minified(source) {
        return Some(source.to_path_buf());
    }
    let kind = FileKind::of(source)?;
    let name = source.file_name()?.to_str()?;
    let stem = &name[..name.len() - kind.suffix().len()];
    Some(source.with_file_name(format!("{stem}.min.{}", kind.compiled_extension())))
}

/// Compiled sibling for kinds that need a compile step (`a.less` → `a.less.css`).
pub fn compiled_path(source: &Path) -> Option<PathBuf> {
    let kind = FileKind::of(source).filter(|k| k.needs_compile())?;
    let mut name = source.file_name()?.to_os_string();
    name.push(".");
    name.push(kind.compiled_extension());
    Some(source.with_file_name(name))
}
