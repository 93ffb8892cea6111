//! `frappe resolve` and `frappe imports`.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::bundler::Bundler;
use crate::cli::QueryArgs;
use crate::toolchain::Toolchain;

/// Print the flattened include list of a manifest.
pub fn run_resolve<T: Toolchain>(bundler: &Bundler<T>, args: &QueryArgs) -> Result<()> {
    let files = bundler.resolve(&args.manifest)?;
    print_paths(&files, args.json)
}

/// Print the transitive import files of a manifest's stylesheets.
pub fn run_imports<T: Toolchain>(bundler: &Bundler<T>, args: &QueryArgs) -> Result<()> {
    let files = bundler.import_files(&args.manifest)?;
    print_paths(&files, args.json)
}

fn print_paths(paths: &[PathBuf], json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    write_paths(&mut out, paths, json)?;
    out.flush()?;
    Ok(())
}

fn write_paths(out: &mut impl Write, paths: &[PathBuf], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, paths)?;
        writeln!(out)?;
    } else {
        for path in paths {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}
