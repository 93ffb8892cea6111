//! File classification by filename suffix.
//!
//! Pure predicates, no I/O. Matching is case-insensitive and only looks at
//! the final path component, so dots in directory names never matter.

use std::path::Path;

/// Kind of source asset an include can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// `*.css`
    Css,
    /// `*.less`, compiled to a `*.less.css` sibling.
    Less,
    /// `*.js`
    JavaScript,
    /// `*.js.html`, compiled to a `*.js.html.js` sibling.
    JsTemplate,
}

impl FileKind {
    /// Classify a path by its suffix.
    pub fn of(path: &Path) -> Option<Self> {
        let name = lower_file_name(path)?;
        [Self::JsTemplate, Self::Less, Self::Css, Self::JavaScript]
            .into_iter()
            .find(|kind| name.ends_with(kind.suffix()))
    }

    /// Suffix (with leading dot) identifying this kind.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Css => ".css",
            Self::Less => ".less",
            Self::JavaScript => ".js",
            Self::JsTemplate => ".js.html",
        }
    }

    /// Extension of the file after compilation (`css` or `js`).
    pub const fn compiled_extension(self) -> &'static str {
        match self {
            Self::Css | Self::Less => "css",
            Self::JavaScript | Self::JsTemplate => "js",
        }
    }

    /// Whether a compile step runs before minification.
    pub const fn needs_compile(self) -> bool {
        matches!(self, Self::Less | Self::JsTemplate)
    }

    /// Whether the file can carry `@import` statements.
    pub const fn has_imports(self) -> bool {
        matches!(self, Self::Css | Self::Less)
    }
}

pub fn is_css(path: &Path) -> bool {
    FileKind::of(path) == Some(FileKind::Css)
}

pub fn is_less(path: &Path) -> bool {
    FileKind::of(path) == Some(FileKind::Less)
}

pub fn is_javascript(path: &Path) -> bool {
    FileKind::of(path) == Some(FileKind::JavaScript)
}

pub fn is_js_template(path: &Path) -> bool {
    FileKind::of(path) == Some(FileKind::JsTemplate)
}

/// Whether the file is already minified (`*.min.<ext>`).
pub fn is_minified(path: &Path) -> bool {
    let Some(name) = lower_file_name(path) else {
        return false;
    };
    match name.rsplit_once('.') {
        Some((stem, ext)) => !ext.is_empty() && stem.ends_with(".min"),
        None => false,
    }
}

fn lower_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
}
