//! Style engine boundary: Sass compilation, vendor prefixing, minification.
//!
//! The engines themselves are external collaborators (grass, lightningcss);
//! this module owns the calling convention and the error boundary. Engine
//! errors are forwarded verbatim as stage failures, never retried.

use std::path::{Path, PathBuf};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use thiserror::Error;

/// Style engine failure.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Sass compilation failed (syntax errors in source stylesheets).
    #[error("sass compilation failed: {0}")]
    Compile(String),

    /// Post-processing (prefixing/minification) failed.
    #[error("css processing failed: {0}")]
    Process(String),
}

/// One stylesheet compilation request.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    /// Entry stylesheet.
    pub entry: &'a Path,
    /// Additional include directories for `@import` resolution.
    pub include_paths: &'a [PathBuf],
    /// Requested numeric output precision.
    pub precision: u8,
}

/// Compile an entry stylesheet to expanded CSS.
///
/// The engine emits at dart-sass's fixed 10-digit precision; the request's
/// precision is honored up to that ceiling.
pub fn compile(request: &CompileRequest) -> Result<String, StyleError> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    for path in request.include_paths {
        options = options.load_path(path);
    }
    if request.precision < 10 {
        crate::debug!("style"; "precision {} requested, engine emits 10", request.precision);
    }
    grass::from_path(request.entry, &options).map_err(|e| StyleError::Compile(e.to_string()))
}

/// Browser targets driving vendor-prefix generation.
///
/// Old enough that the prefixed and unprefixed rule coexist in the output
/// rather than the prefix being dropped as redundant.
fn prefix_targets() -> Targets {
    Targets::from(Browsers {
        chrome: Some(55 << 16),
        edge: Some(15 << 16),
        firefox: Some(52 << 16),
        ie: Some(11 << 16),
        ios_saf: Some(10 << 16),
        safari: Some(10 << 16),
        ..Browsers::default()
    })
}

/// Add vendor prefixes for the configured browser targets.
///
/// Prints without targets so handwritten prefixes already present in the
/// source survive alongside the generated ones.
pub fn autoprefix(css: &str) -> Result<String, StyleError> {
    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| StyleError::Process(e.to_string()))?;
    sheet
        .minify(MinifyOptions {
            targets: prefix_targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| StyleError::Process(e.to_string()))?;
    let out = sheet
        .to_css(PrinterOptions::default())
        .map_err(|e| StyleError::Process(e.to_string()))?;
    Ok(out.code)
}

/// Minify CSS.
///
/// Whitespace-level minification only: no structural pass runs here, so
/// numeric values keep every significant digit present in the source.
pub fn minify(source: &str) -> Result<String, StyleError> {
    let sheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| StyleError::Process(e.to_string()))?;
    let out = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| StyleError::Process(e.to_string()))?;
    Ok(out.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_compile_with_include_path() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("_colors.scss"), "$brand: #1589ee;\n").unwrap();

        let entry = dir.path().join("index.scss");
        fs::write(&entry, "@import \"colors\";\n.brand { color: $brand; }\n").unwrap();

        let css = compile(&CompileRequest {
            entry: &entry,
            include_paths: &[lib],
            precision: 10,
        })
        .unwrap();
        assert!(css.contains(".brand"));
        assert!(css.contains("#1589ee"));
    }

    #[test]
    fn test_compile_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("broken.scss");
        fs::write(&entry, ".a { color: ; }\n").unwrap();

        let err = compile(&CompileRequest {
            entry: &entry,
            include_paths: &[],
            precision: 10,
        })
        .unwrap_err();
        assert!(matches!(err, StyleError::Compile(_)));
    }

    #[test]
    fn test_minify_shrinks_but_keeps_values() {
        let source = ".spacing-xx-small {\n  padding: 0.125rem;\n}\n";
        let min = minify(source).unwrap();
        assert!(min.len() < source.len());
        // Rounding is off: every significant digit survives
        assert!(min.contains("125rem"));
    }

    #[test]
    fn test_minify_rejects_invalid_css() {
        assert!(minify(".a { color: }").is_err());
    }

    #[test]
    fn test_autoprefix_preserves_rules() {
        let out = autoprefix(".a {\n  color: red;\n}\n").unwrap();
        assert!(out.contains(".a"));
        assert!(out.contains("red"));
    }
}
