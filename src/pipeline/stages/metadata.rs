//! Metadata rewrite stage.

use std::fs;

use anyhow::{Context, Result};

use crate::package::PackageMetadata;
use crate::pipeline::{BuildContext, Stage};

/// Write the distributed `package.json` into the output root: published
/// name in place of the internal one, internal-only fields removed.
pub struct RewriteMetadata;

impl Stage for RewriteMetadata {
    fn name(&self) -> &'static str {
        "rewrite-metadata"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let rewritten = ctx.metadata.rewritten(
            &ctx.config.package.published_name,
            &ctx.config.package.flag_field,
        );
        let json = PackageMetadata::to_pretty_json(&rewritten)?;

        let dest = ctx.layout.output_root.join("package.json");
        fs::write(&dest, json)
            .with_context(|| format!("Failed to write metadata: {}", dest.display()))?;
        Ok(())
    }
}
