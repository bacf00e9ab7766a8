//! Version banner stage.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::{BuildContext, Stage};
use crate::utils::path::{relative_to, walk_files};

/// Prepend a one-line product/version banner to each output stylesheet,
/// in the comment syntax of the file's own language.
///
/// Compiled `.css` files get `/*! <name> <version> */`. Sass sources get
/// `// <name> <version>`, skipping vendor-supplied files and the entry
/// index (it only forwards imports).
pub struct PrependVersionBanner;

impl PrependVersionBanner {
    fn prepend(path: &Path, banner: &str) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        fs::write(path, format!("{banner}\n{content}"))
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        Ok(())
    }
}

impl Stage for PrependVersionBanner {
    fn name(&self) -> &'static str {
        "version-banner"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let css_banner = ctx.css_banner();
        let styles_dir = ctx.layout.styles_dir();
        if styles_dir.is_dir() {
            for path in walk_files(&styles_dir) {
                if path.extension().is_some_and(|e| e == "css") {
                    Self::prepend(&path, &css_banner)?;
                }
            }
        }

        let scss_banner = ctx.scss_banner();
        let scss_dir = ctx.layout.scss_dir();
        if scss_dir.is_dir() {
            let vendor = &ctx.config.paths.scss_vendor;
            let entry = &ctx.config.build.entry;
            for path in walk_files(&scss_dir) {
                if !matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("scss" | "sass")
                ) {
                    continue;
                }
                let rel = relative_to(&path, &scss_dir);
                if rel.starts_with(vendor) || rel == *entry {
                    continue;
                }
                Self::prepend(&path, &scss_banner)?;
            }
        }
        Ok(())
    }
}
