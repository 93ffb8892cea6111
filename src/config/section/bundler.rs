//! `[bundler]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [bundler]
//! path_case = "auto"      # auto | sensitive | insensitive
//! keep_going = false      # build every manifest even after one fails
//! ```
//!
//! `auto` compares paths case-insensitively on Windows and macOS.

use serde::{Deserialize, Serialize};

use crate::bundler::BundlerOptions;
use crate::utils::path::PathCase;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// How two include paths are compared for dedup.
    pub path_case: PathCase,

    /// Attempt every manifest and report all failures together.
    pub keep_going: bool,
}

impl BundlerConfig {
    pub fn options(&self) -> BundlerOptions {
        BundlerOptions {
            path_case: self.path_case,
            keep_going: self.keep_going,
        }
    }
}
