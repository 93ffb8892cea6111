//! `@import` discovery and inlining.
//!
//! Recognised statements (case-insensitive):
//!
//! ```text
//! @import "child.css";
//! @import 'child.css';
//! @import url("child.css");
//! @import url('child.css');
//! ```
//!
//! Import targets resolve relative to the directory of the file containing
//! the statement. Targets with a scheme (`http://`), protocol-relative
//! (`//cdn/...`) or root-relative (`/site.css`) are not files we can follow
//! and are left alone.

use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::paths::rewrite_relative_paths;
use crate::utils::path::{normalize_path, parent_dir, resolve_path};

const BOM: &str = "\u{feff}";

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)@import\s*(?:url\()?["']([^"'\n]+)["']\)?;"#).unwrap()
});

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// One `@import` statement found in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssImport {
    /// Target exactly as written in the statement.
    pub import_file: String,
    /// Absolute path the target resolves to.
    pub resolved: PathBuf,
    /// Full statement text, e.g. `@import "child.css";`.
    pub statement: String,
    /// File the statement was found in.
    pub containing_file: PathBuf,
}

struct ImportMatch {
    range: Range<usize>,
    import: CssImport,
}

/// Read a stylesheet as text.
///
/// A leading byte-order mark is dropped and invalid UTF-8 is replaced, so
/// legacy-encoded files still bundle.
pub fn read_stylesheet(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix(BOM).unwrap_or(&text).to_owned())
}

/// Whether an import target names a file relative to the importing stylesheet.
pub(crate) fn is_relative_reference(target: &str) -> bool {
    !target.is_empty()
        && !target.starts_with('/')
        && !target.starts_with('\\')
        && !SCHEME_RE.is_match(target)
}

/// Direct (non-recursive) relative imports of `css`, in source order.
fn direct_imports(css: &str, file: &Path) -> Vec<ImportMatch> {
    let dir = parent_dir(file);
    IMPORT_RE
        .captures_iter(css)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let target = caps.get(1)?.as_str();
            if !is_relative_reference(target) {
                return None;
            }
            Some(ImportMatch {
                range: whole.range(),
                import: CssImport {
                    import_file: target.to_owned(),
                    resolved: resolve_path(Path::new(target), &dir),
                    statement: whole.as_str().to_owned(),
                    containing_file: file.to_path_buf(),
                },
            })
        })
        .collect()
}

/// Collect the transitive imports of `css`, which originated from `origin_file`.
///
/// Depth-first and pre-order: each import is listed before the imports it
/// pulls in. Imports whose target does not exist are handed to `on_missing`
/// and not descended into. A file already on the current import chain is
/// listed again but not re-entered, so cyclic imports terminate.
pub fn parse_imports<F>(css: &str, origin_file: &Path, mut on_missing: F) -> io::Result<Vec<CssImport>>
where
    F: FnMut(&CssImport),
{
    let origin = normalize_path(origin_file);
    let mut chain = vec![origin.clone()];
    let mut out = Vec::new();
    collect_imports(css, &origin, &mut chain, &mut out, &mut on_missing)?;
    Ok(out)
}

fn collect_imports(
    css: &str,
    file: &Path,
    chain: &mut Vec<PathBuf>,
    out: &mut Vec<CssImport>,
    on_missing: &mut dyn FnMut(&CssImport),
) -> io::Result<()> {
    for ImportMatch { import, .. } in direct_imports(css, file) {
        if !import.resolved.is_file() {
            on_missing(&import);
            continue;
        }

        let child = import.resolved.clone();
        out.push(import);

        if chain.contains(&child) {
            crate::debug!("import"; "cyclic import of {} skipped", child.display());
            continue;
        }

        let child_css = read_stylesheet(&child)?;
        chain.push(child.clone());
        collect_imports(&child_css, &child, chain, out, on_missing)?;
        chain.pop();
    }
    Ok(())
}

/// Resolved transitive import files of the stylesheet at `file`.
pub fn file_imports<F>(file: &Path, on_missing: F) -> io::Result<Vec<PathBuf>>
where
    F: FnMut(&CssImport),
{
    let css = read_stylesheet(file)?;
    let imports = parse_imports(&css, file, on_missing)?;
    Ok(imports.into_iter().map(|i| i.resolved).collect())
}

/// Read `file` and inline every `@import` recursively.
///
/// Each statement is replaced in place by the expanded text of its target,
/// with the target's relative paths rebased onto the importing file's
/// directory. Statements whose target is missing are reported through `on_missing` and
/// kept verbatim; statements that would re-enter a file already being
/// expanded are kept verbatim too.
pub fn expanded_css<F>(file: &Path, mut on_missing: F) -> io::Result<String>
where
    F: FnMut(&CssImport),
{
    let file = normalize_path(file);
    let mut chain = Vec::new();
    expand(&file, &mut chain, &mut on_missing)
}

fn expand(
    file: &Path,
    chain: &mut Vec<PathBuf>,
    on_missing: &mut dyn FnMut(&CssImport),
) -> io::Result<String> {
    let css = read_stylesheet(file)?;
    let dir = parent_dir(file);
    chain.push(file.to_path_buf());

    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    for ImportMatch { range, import } in direct_imports(&css, file) {
        out.push_str(&css[last..range.start]);
        if !import.resolved.is_file() {
            on_missing(&import);
            out.push_str(&import.statement);
        } else if chain.contains(&import.resolved) {
            out.push_str(&import.statement);
        } else {
            let inlined = expand(&import.resolved, chain, on_missing)?;
            let child_dir = parent_dir(&import.resolved);
            if child_dir == dir {
                out.push_str(&inlined);
            } else {
                out.push_str(&rewrite_relative_paths(&inlined, &child_dir, &dir)?);
            }
        }
        last = range.end;
    }
    out.push_str(&css[last..]);

    chain.pop();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// master.css → child.css → sub/sub_child.css → sub/missing.css
    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(
            root.join("master.css"),
            "@import \"child.css\";\n.master { color: #fff; }",
        )
        .unwrap();
        fs::write(
            root.join("child.css"),
            "@import url('sub/sub_child.css');\n.child { color: #fff; }",
        )
        .unwrap();
        fs::write(
            root.join("sub/sub_child.css"),
            "@import \"missing.css\";\n.sub-child { color: #fff; }",
        )
        .unwrap();
        (dir, root)
    }

    #[test]
    fn test_parse_imports_preorder() {
        let (_dir, root) = fixture();
        let master = root.join("master.css");
        let css = fs::read_to_string(&master).unwrap();

        let mut missing = Vec::new();
        let imports = parse_imports(&css, &master, |i| missing.push(i.clone())).unwrap();

        let resolved: Vec<_> = imports.iter().map(|i| i.resolved.clone()).collect();
        assert_eq!(
            resolved,
            vec![root.join("child.css"), root.join("sub/sub_child.css")]
        );
        assert_eq!(imports[1].statement, "@import url('sub/sub_child.css');");
        assert_eq!(imports[1].containing_file, root.join("child.css"));

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].import_file, "missing.css");
        assert_eq!(missing[0].resolved, root.join("sub/missing.css"));
        assert_eq!(missing[0].statement, "@import \"missing.css\";");
        assert_eq!(missing[0].containing_file, root.join("sub/sub_child.css"));
    }

    #[test]
    fn test_expanded_css_inlines_and_keeps_missing() {
        let (_dir, root) = fixture();
        let mut missing = 0;
        let css = expanded_css(&root.join("master.css"), |_| missing += 1).unwrap();

        assert_eq!(
            css,
            "@import \"missing.css\";\n.sub-child { color: #fff; }\n\
             .child { color: #fff; }\n\
             .master { color: #fff; }"
        );
        assert_eq!(missing, 1);
    }

    #[test]
    fn test_single_missing_import_reported_once() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.css");
        fs::write(&file, "@import \"missing.css\";\nbody{}").unwrap();

        let mut statements = Vec::new();
        let css = expanded_css(&file, |i| statements.push(i.statement.clone())).unwrap();
        assert_eq!(statements, vec!["@import \"missing.css\";".to_owned()]);
        assert_eq!(css, "@import \"missing.css\";\nbody{}");
    }

    #[test]
    fn test_absolute_imports_ignored() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.css");
        let css = "@import url(\"https://fonts.example.com/x.css\");\n\
                   @import \"//cdn.example.com/y.css\";\n\
                   @import \"/site/z.css\";\nbody{}";
        fs::write(&file, css).unwrap();

        let mut missing = 0;
        assert!(parse_imports(css, &file, |_| missing += 1).unwrap().is_empty());
        assert_eq!(expanded_css(&file, |_| missing += 1).unwrap(), css);
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_cyclic_imports_terminate() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::write(root.join("a.css"), "@import \"b.css\";\n.a{}").unwrap();
        fs::write(root.join("b.css"), "@import \"a.css\";\n.b{}").unwrap();

        let imports = file_imports(&root.join("a.css"), |_| {}).unwrap();
        assert_eq!(imports, vec![root.join("b.css"), root.join("a.css")]);

        let css = expanded_css(&root.join("a.css"), |_| {}).unwrap();
        assert_eq!(css, "@import \"a.css\";\n.b{}\n.a{}");
    }

    #[test]
    fn test_less_imports() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(
            root.join("local.less"),
            "@import \"sub/local.less\";\n@import \"include.less\";\n@c: #fff;",
        )
        .unwrap();
        fs::write(root.join("sub/local.less"), ".s{}").unwrap();
        fs::write(root.join("include.less"), "@IMPORT 'include_include.less';").unwrap();
        fs::write(root.join("include_include.less"), ".ii{}").unwrap();

        let imports = file_imports(&root.join("local.less"), |_| {}).unwrap();
        assert_eq!(
            imports,
            vec![
                root.join("sub/local.less"),
                root.join("include.less"),
                root.join("include_include.less"),
            ]
        );
    }

    #[test]
    fn test_is_relative_reference() {
        assert!(is_relative_reference("child.css"));
        assert!(is_relative_reference("../x/child.css"));
        assert!(!is_relative_reference("http://x/a.css"));
        assert!(!is_relative_reference("data:text/css,a"));
        assert!(!is_relative_reference("/a.css"));
        assert!(!is_relative_reference(""));
    }

    #[test]
    fn test_expanded_css_rebases_imported_paths() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::create_dir_all(root.join("css/sub/deep")).unwrap();
        fs::write(root.join("css/app.css"), "@import \"sub/part.css\";\n.a{}").unwrap();
        fs::write(
            root.join("css/sub/part.css"),
            "@import 'deep/leaf.css';\n.p{background:url(img/x.png)}",
        )
        .unwrap();
        fs::write(root.join("css/sub/deep/leaf.css"), ".l{background:url('../../font.woff')}").unwrap();

        let css = expanded_css(&root.join("css/app.css"), |_| {}).unwrap();
        assert_eq!(
            css,
            ".l{background:url('font.woff')}\n\
             .p{background:url(sub/img/x.png)}\n\
             .a{}"
        );
    }

    #[test]
    fn test_read_stylesheet_strips_bom() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::write(root.join("a.css"), "@import \"b.css\";\n.a{}").unwrap();
        fs::write(root.join("b.css"), "\u{feff}.b{}").unwrap();

        assert_eq!(read_stylesheet(&root.join("b.css")).unwrap(), ".b{}");
        let css = expanded_css(&root.join("a.css"), |_| {}).unwrap();
        assert_eq!(css, ".b{}\n.a{}");
    }

    #[test]
    fn test_read_stylesheet_tolerates_legacy_encoding() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("latin1.css");
        fs::write(&file, b".a{content:\"caf\xe9\"}").unwrap();

        let css = read_stylesheet(&file).unwrap();
        assert!(css.starts_with(".a{content:\"caf"), "{css}");
    }
}
