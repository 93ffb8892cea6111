//! Relative path discovery and rewriting inside stylesheets.
//!
//! A path token is either the argument of `url(...)` (bare, single- or
//! double-quoted) or a bare quoted string literal. Absolute URLs
//! (`http(s)://`) and root-relative paths (`/img/a.png`) are never touched.
//!
//! Moving css from `source_dir` to `target_dir` (e.g. when concatenating an
//! include into a bundle that lives elsewhere) re-expresses every token
//! relative to `target_dir`:
//!
//! ```text
//! /proj/css/app.css        url(images/a.png)
//! → /proj/bundles/x.css    url(../css/images/a.png)
//! ```

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use super::imports::is_relative_reference;
use crate::utils::path::normalize_path;

static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?P<pre>(?P<url>url\(\s*["']?)|["'])(?P<path>[^"'\n)]*?)(?P<post>\s*["']|\s*\))"#,
    )
    .unwrap()
});

/// A path token matched by [`PATH_RE`] that is worth looking at.
struct PathToken<'a> {
    whole: regex::Match<'a>,
    pre: &'a str,
    path: &'a str,
    post: &'a str,
    in_url: bool,
}

impl<'a> PathToken<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let path = caps.name("path")?.as_str();
        if !is_rewritable(path) {
            return None;
        }
        Some(Self {
            whole: caps.get(0)?,
            pre: caps.name("pre")?.as_str(),
            path,
            post: caps.name("post")?.as_str(),
            in_url: caps.name("url").is_some(),
        })
    }
}

fn is_rewritable(path: &str) -> bool {
    !path.trim().is_empty()
        && is_relative_reference(path) && !path.starts_with('#')
}

/// Relative path tokens found in `css`, in source order.
pub fn relative_paths(css: &str) -> Vec<&str> {
    PATH_RE
        .captures_iter(css)
        .filter_map(|caps| PathToken::from_captures(&caps).map(|t| t.path))
        .collect()
}

/// Rewrite the relative paths in `css` from `source_dir` to `target_dir`.
///
/// A token is rewritten only when it sits inside `url(...)` or names a file
/// that exists relative to `source_dir`; other string literals (font names,
/// `content` values) stay as they are. The surrounding quotes are preserved.
pub fn rewrite_relative_paths(css: &str, source_dir: &Path, target_dir: &Path) -> io::Result<String> {
    let base = directory_url(&normalize_path(source_dir))?;
    let target = directory_url(&normalize_path(target_dir))?;

    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    for caps in PATH_RE.captures_iter(css) {
        let Some(token) = PathToken::from_captures(&caps) else {
            continue;
        };
        let Some(rewritten) = rebase(&token, &base, &target) else {
            continue;
        };

        out.push_str(&css[last..token.whole.start()]);
        out.push_str(token.pre);
        out.push_str(&rewritten);
        out.push_str(token.post);
        last = token.whole.end();
    }
    out.push_str(&css[last..]);
    Ok(out)
}

/// Resolve `token` against `base` and express it relative to `target`.
fn rebase(token: &PathToken<'_>, base: &Url, target: &Url) -> Option<String> {
    let absolute = base.join(token.path).ok()?;
    if absolute.scheme() != "file" {
        return None;
    }

    if !token.in_url {
        let mut file = absolute.clone();
        file.set_query(None);
        file.set_fragment(None);
        if !file.to_file_path().is_ok_and(|p| p.is_file()) {
            return None;
        }
    }

    target.make_relative(&absolute)
}

fn directory_url(dir: &Path) -> io::Result<Url> {
    Url::from_directory_path(dir).map_err(|()| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot express `{}` as a file url", dir.display()),
        )
    })
}
