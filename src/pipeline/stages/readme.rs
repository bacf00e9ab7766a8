//! README annotation stage.

use std::fs;

use anyhow::{Context, Result};

use crate::pipeline::{BuildContext, Stage};

/// Turn the copied distribution README source into the canonical
/// `README.md`: prepend a two-line product/version heading, write under
/// the output name, remove the source copy.
pub struct AnnotateReadme;

impl Stage for AnnotateReadme {
    fn name(&self) -> &'static str {
        "annotate-readme"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let source = ctx
            .layout
            .output_root
            .join(&ctx.config.assets.readme_source);
        let body = fs::read_to_string(&source)
            .with_context(|| format!("Failed to read README source: {}", source.display()))?;

        let annotated = format!(
            "# {}\n# Version {}\n\n{}",
            ctx.config.package.display_name, ctx.metadata.version, body
        );

        let dest = ctx.layout.output_root.join("README.md");
        fs::write(&dest, annotated)
            .with_context(|| format!("Failed to write: {}", dest.display()))?;
        fs::remove_file(&source)
            .with_context(|| format!("Failed to remove: {}", source.display()))?;
        Ok(())
    }
}
