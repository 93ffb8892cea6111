//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Frappe incremental CSS/LESS/JS bundler
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the current directory
    #[arg(short = 'C', long, default_value = "frappe.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Bring bundle outputs up to date
    #[command(visible_alias = "b")]
    Build {
        /// Bundle manifests (`*.css.bundle`, `*.js.bundle`)
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        manifests: Vec<PathBuf>,

        /// Attempt every manifest and report all failures at the end
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Print the flattened include list of a manifest
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: QueryArgs,
    },

    /// Print the transitive `@import` files of a manifest's stylesheets
    #[command(visible_alias = "i")]
    Imports {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Arguments shared by the read-only queries.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Bundle manifest to inspect
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub manifest: PathBuf,

    /// Print a JSON array instead of one path per line
    #[arg(short, long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_build_args() {
        let cli = parse(&["frappe", "b", "a.css.bundle", "b.js.bundle", "--keep-going"]);
        match cli.command {
            Commands::Build {
                manifests,
                keep_going,
            } => {
                assert_eq!(
                    manifests,
                    vec![PathBuf::from("a.css.bundle"), PathBuf::from("b.js.bundle")]
                );
                assert!(keep_going);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("frappe.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_build_requires_manifest() {
        assert!(Cli::try_parse_from(["frappe", "build"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["frappe", "-C", "ci.toml", "resolve", "site.css.bundle", "--json", "-V"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("ci.toml"));
        let Commands::Resolve { args } = cli.command else {
            panic!("expected resolve");
        };
        assert!(args.json);
        assert_eq!(args.manifest, PathBuf::from("site.css.bundle"));
    }
}
