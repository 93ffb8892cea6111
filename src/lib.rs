//! Frappe: incremental CSS/LESS/JS bundling.
//!
//! A bundle manifest (`site.css.bundle`) lists source files and nested
//! manifests. Building it compiles LESS and JS-HTML templates, minifies
//! every include next to its source and concatenates the results into one
//! output, regenerating only what is older than its inputs.
//!
//! ```ignore
//! use frappe::{Bundler, BundlerOptions, NoEvents, toolchain::ConfiguredToolchain};
//!
//! let bundler = Bundler::new(ConfiguredToolchain::default(), BundlerOptions::default());
//! let summary = bundler.build(Path::new("site.css.bundle"), &mut NoEvents)?;
//! ```

pub mod bundler;
pub mod classify;
pub mod cli;
pub mod config;
pub mod css;
pub mod error;
pub mod freshness;
pub mod logger;
pub mod manifest;
pub mod toolchain;
pub mod utils;

pub use bundler::{BuildEvents, BuildSummary, Bundler, BundlerOptions, NoEvents};
pub use error::{BundleError, Result};
pub use manifest::{Entry, Include, Manifest};
