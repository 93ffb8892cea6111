//! Compilers and minifiers the bundler delegates to.
//!
//! The bundler only knows the [`Toolchain`] trait. Two implementations ship:
//!
//! - [`Passthrough`]: copies every input to its output unchanged.
//! - [`ConfiguredToolchain`]: one [`ToolSpec`] per operation, read from the
//!   `[tools]` section of `frappe.toml`.
//!
//! ```toml
//! [tools]
//! less = ["lessc", "{input}", "{output}"]
//! template = ["node", "tools/tmpl.js", "{input}"]   # stdout becomes the output
//! css = "native"
//! js = "copy"
//! ```
//!
//! Relative programs and the commands themselves run from the directory
//! holding `frappe.toml`, so `tools/tmpl.js` above resolves there.

pub mod minify;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::ToolsConfig;
use crate::debug;
use crate::utils::exec::Cmd;

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

// ============================================================================
// Toolchain trait
// ============================================================================

/// The four file transforms a build needs.
///
/// Each call reads `input` and must leave the result at `output`. Calls are
/// blocking; an error aborts the transform of that one file.
pub trait Toolchain {
    fn compile_less(&self, input: &Path, output: &Path) -> Result<()>;
    fn compile_template(&self, input: &Path, output: &Path) -> Result<()>;
    fn minify_css(&self, input: &Path, output: &Path) -> Result<()>;
    fn minify_js(&self, input: &Path, output: &Path) -> Result<()>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn compile_less(&self, input: &Path, output: &Path) -> Result<()> {
        (**self).compile_less(input, output)
    }
    fn compile_template(&self, input: &Path, output: &Path) -> Result<()> {
        (**self).compile_template(input, output)
    }
    fn minify_css(&self, input: &Path, output: &Path) -> Result<()> {
        (**self).minify_css(input, output)
    }
    fn minify_js(&self, input: &Path, output: &Path) -> Result<()> {
        (**self).minify_js(input, output)
    }
}

/// Copies input to output for every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Toolchain for Passthrough {
    fn compile_less(&self, input: &Path, output: &Path) -> Result<()> {
        copy(input, output)
    }
    fn compile_template(&self, input: &Path, output: &Path) -> Result<()> {
        copy(input, output)
    }
    fn minify_css(&self, input: &Path, output: &Path) -> Result<()> {
        copy(input, output)
    }
    fn minify_js(&self, input: &Path, output: &Path) -> Result<()> {
        copy(input, output)
    }
}

// ============================================================================
// Tool specs
// ============================================================================

/// A transform implemented inside this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinTool {
    /// lightningcss / oxc; minifiers only.
    Native,
    Copy,
}

/// How one operation is carried out: `"native"`, `"copy"`, or a command line.
///
/// Command arguments may contain `{input}` and `{output}`. Without an
/// `{output}` placeholder the command's stdout is written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolSpec {
    Builtin(BuiltinTool),
    Command(Vec<String>),
}

impl ToolSpec {
    pub fn command<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Command(args.into_iter().map(Into::into).collect())
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Builtin(BuiltinTool::Native))
    }
}

/// The operation a spec is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Less,
    Template,
    Css,
    Js,
}

impl Operation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Less => "less",
            Self::Template => "template",
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    pub const fn supports_native(self) -> bool {
        matches!(self, Self::Css | Self::Js)
    }

    fn native(self, source: &str) -> Result<String> {
        match self {
            Self::Css => minify::minify_css(source),
            Self::Js => minify::minify_js(source),
            Self::Less | Self::Template => {
                bail!("`native` is not available for the `{}` tool", self.name())
            }
        }
    }
}

// ============================================================================
// ConfiguredToolchain
// ============================================================================

/// A [`Toolchain`] assembled from `[tools]`.
#[derive(Debug, Clone)]
pub struct ConfiguredToolchain {
    less: ToolSpec,
    template: Option<ToolSpec>,
    css: ToolSpec,
    js: ToolSpec,
    /// Directory commands resolve and run from; the process cwd when unset.
    root: Option<PathBuf>,
}

impl ConfiguredToolchain {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            less: tools.less.clone(),
            template: tools.template.clone(),
            css: tools.css.clone(),
            js: tools.js.clone(),
            root: None,
        }
    }

    /// Resolve relative tool paths against `root` and run commands there.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn run(&self, op: Operation, spec: Option<&ToolSpec>, input: &Path, output: &Path) -> Result<()> {
        let Some(spec) = spec else {
            bail!(
                "no `{}` tool configured for `{}`; set `[tools] {}` in frappe.toml",
                op.name(),
                input.display(),
                op.name()
            );
        };
        ensure_parent(output)?;

        match spec {
            ToolSpec::Builtin(BuiltinTool::Copy) => copy(input, output),
            ToolSpec::Builtin(BuiltinTool::Native) => {
                debug!(op.name(); "native {} -> {}", input.display(), output.display());
                let source = fs::read_to_string(input)
                    .with_context(|| format!("Failed to read `{}`", input.display()))?;
                let code = op.native(&source)?;
                fs::write(output, code)
                    .with_context(|| format!("Failed to write `{}`", output.display()))
            }
            ToolSpec::Command(argv) => self.run_command(op, argv, input, output),
        }
    }

    fn run_command(&self, op: Operation, argv: &[String], input: &Path, output: &Path) -> Result<()> {
        let Some((program, args)) = argv.split_first() else {
            bail!("the `{}` tool command is empty", op.name());
        };

        let root = self.root.as_deref();
        let program = find_program(program, root)
            .with_context(|| format!("`{program}` not found; check `[tools] {}`", op.name()))?;

        // The child runs from `root`, so hand it paths that survive the chdir
        let (input, output) = match root {
            Some(_) => (absolute(input)?, absolute(output)?),
            None => (input.to_path_buf(), output.to_path_buf()),
        };
        let input_arg = input.to_string_lossy();
        let output_arg = output.to_string_lossy();
        let writes_output = args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER));
        let args = args.iter().map(|a| {
            a.replace(INPUT_PLACEHOLDER, &input_arg)
                .replace(OUTPUT_PLACEHOLDER, &output_arg)
        });

        debug!(op.name(); "{} {}", program.display(), input.display());
        let mut cmd = Cmd::new(&program).args(args);
        if let Some(root) = root {
            cmd = cmd.cwd(root);
        }
        let result = cmd.run()?;

        if !writes_output {
            fs::write(&output, &result.stdout)
                .with_context(|| format!("Failed to write `{}`", output.display()))?;
        }
        Ok(())
    }
}

impl Default for ConfiguredToolchain {
    fn default() -> Self {
        Self::new(&ToolsConfig::default())
    }
}

impl Toolchain for ConfiguredToolchain {
    fn compile_less(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(Operation::Less, Some(&self.less), input, output)
    }
    fn compile_template(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(Operation::Template, self.template.as_ref(), input, output)
    }
    fn minify_css(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(Operation::Css, Some(&self.css), input, output)
    }
    fn minify_js(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(Operation::Js, Some(&self.js), input, output)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Locate a tool program. `~` is expanded; a relative path containing a
/// separator resolves against `root`, a bare name is searched on `PATH`.
pub fn find_program(program: &str, root: Option<&Path>) -> which::Result<PathBuf> {
    let program = shellexpand::tilde(program);
    match root {
        Some(root) => which::which_in(&*program, env::var_os("PATH"), root),
        None => which::which(&*program),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve `{}`", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory `{}`", parent.display()))?;
    }
    Ok(())
}

fn copy(input: &Path, output: &Path) -> Result<()> {
    ensure_parent(output)?;
    fs::copy(input, output).with_context(|| {
        format!(
            "Failed to copy `{}` to `{}`",
            input.display(),
            output.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests;
