//! Manifest emission stage.

use std::fs;

use anyhow::{Context, Result};

use crate::package::describe_components;
use crate::pipeline::{BuildContext, Stage};

/// Serialize the component descriptions to `components.json` at the output
/// root. Zero components is a valid manifest.
pub struct GenerateManifest;

impl Stage for GenerateManifest {
    fn name(&self) -> &'static str {
        "generate-manifest"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let components = describe_components(&ctx.config)?;
        let mut json = serde_json::to_string_pretty(&components)?;
        json.push('\n');

        let dest = ctx.layout.output_root.join("components.json");
        fs::write(&dest, json)
            .with_context(|| format!("Failed to write manifest: {}", dest.display()))?;
        Ok(())
    }
}
