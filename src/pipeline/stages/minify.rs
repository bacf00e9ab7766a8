//! Minification stage.

use std::fs;

use anyhow::{Context, Result};

use crate::pipeline::{BuildContext, Stage};
use crate::style;

/// Write a `<stem>.min.css` sibling for every compiled stylesheet in the
/// styles directory. Already-minified files are left alone.
pub struct MinifyStyleBundle;

impl Stage for MinifyStyleBundle {
    fn name(&self) -> &'static str {
        "minify-styles"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let styles_dir = ctx.layout.styles_dir();
        if !styles_dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&styles_dir)
            .with_context(|| format!("Failed to read: {}", styles_dir.display()))?
        {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".css") || name.ends_with(".min.css") {
                continue;
            }

            let source = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            let minified = style::minify(&source)?;

            let stem = name.trim_end_matches(".css");
            let dest = styles_dir.join(format!("{stem}.min.css"));
            fs::write(&dest, minified)
                .with_context(|| format!("Failed to write: {}", dest.display()))?;
        }
        Ok(())
    }
}
