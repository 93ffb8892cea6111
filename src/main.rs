//! Frappe - incremental CSS/LESS/JS bundler.

use anyhow::Result;
use clap::{ColorChoice, Parser};

use frappe::Bundler;
use frappe::cli::{self, Cli, Commands};
use frappe::config::FrappeConfig;
use frappe::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = FrappeConfig::load(&cli)?;
    let bundler = Bundler::new(config.toolchain(), config.bundler.options());

    match &cli.command {
        Commands::Build { manifests, .. } => cli::build::build_bundles(&bundler, manifests),
        Commands::Resolve { args } => cli::query::run_resolve(&bundler, args),
        Commands::Imports { args } => cli::query::run_imports(&bundler, args),
    }
}
