//! Bundler configuration from `frappe.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [bundler] and [tools]
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # config file discovery
//! └── mod.rs         # FrappeConfig (this file)
//! ```
//!
//! The file is optional. It is searched upward from the current directory;
//! when none is found every section takes its defaults.

pub mod section;
pub mod types;
mod util;

pub use section::{BundlerConfig, ToolsConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::{find_config_file, find_config_file_from};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};
use crate::toolchain::ConfiguredToolchain;
use crate::{debug, log};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing frappe.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrappeConfig {
    /// Absolute path of the file this was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub bundler: BundlerConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

impl FrappeConfig {
    /// Load configuration for a CLI invocation and apply its overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Check every section, collecting all problems before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.tools.validate(Some(&self.root_dir()), &mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Directory holding the config file; the current directory without one.
    pub fn root_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn toolchain(&self) -> ConfiguredToolchain {
        ConfiguredToolchain::new(&self.tools).with_root(self.root_dir())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Build { keep_going, .. } = &cli.command {
            Self::update_option(&mut self.bundler.keep_going, keep_going.then_some(&true));
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> FrappeConfig {
    FrappeConfig::from_str(content).unwrap()
}
