//! In-process minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. A source that does not
//! parse is an error.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify JavaScript source code.
///
/// Sources are parsed as classic scripts; bundled files are concatenated
/// into one script, so module syntax is not expected.
pub fn minify_js(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::default()).parse();
    if let Some(first) = ret.errors.first() {
        return Err(anyhow!(
            "javascript parse failed ({} error(s)): {first}",
            ret.errors.len()
        ));
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("css parse failed: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("css print failed: {e}"))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css() {
        let out = minify_css(".a {\n  color: #ffffff;\n}\n\n.b { margin: 0px; }\n").unwrap();
        assert_eq!(out, ".a{color:#fff}.b{margin:0}");
    }

    #[test]
    fn test_minify_css_keeps_imports_and_urls() {
        let out = minify_css("@import \"child.css\";\n.a { background: url(img/a.png); }").unwrap();
        assert!(out.contains("child.css"), "{out}");
        assert!(out.contains("img/a.png"), "{out}");
    }

    #[test]
    fn test_minify_js() {
        let src = "function add(first, second) {\n  // sum\n  return first + second;\n}\nwindow.add = add;\n";
        let out = minify_js(src).unwrap();
        assert!(out.len() < src.len());
        assert!(!out.contains("// sum"));
        assert!(out.contains("window.add"));
    }

    #[test]
    fn test_minify_js_parse_error() {
        let err = minify_js("function ( {").unwrap_err();
        assert!(err.to_string().contains("javascript parse failed"));
    }
}
