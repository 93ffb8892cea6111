//! Stylesheet text processing: `@import` chains and relative paths.
//!
//! Works on raw text with regular expressions. Nothing here parses css
//! properly; the minifier does that.

mod imports;
mod paths;

pub use imports::{CssImport, expanded_css, file_imports, parse_imports, read_stylesheet};
pub use paths::{relative_paths, rewrite_relative_paths};
