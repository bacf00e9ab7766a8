//! Style bundle compilation stage.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{OutputLayout, ToolConfig};
use crate::pipeline::{BuildContext, Stage};
use crate::style::{self, CompileRequest};

/// Compile the entry stylesheet into the expanded, vendor-prefixed bundle
/// `assets/styles/<module-name>.css`.
pub struct CompileStyleBundle;

impl CompileStyleBundle {
    pub fn packaged() -> Self {
        Self
    }
}

impl Stage for CompileStyleBundle {
    fn name(&self) -> &'static str {
        "compile-styles"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        compile_bundle(&ctx.config, &ctx.layout)?;
        Ok(())
    }
}

/// Compile and write the bundle; shared between the packaging pipeline and
/// the watch-driven recompile.
///
/// Returns the path of the written bundle.
pub fn compile_bundle(config: &ToolConfig, layout: &OutputLayout) -> Result<PathBuf> {
    let entry = config.scss_dir().join(&config.build.entry);
    let include_paths: Vec<PathBuf> = config
        .build
        .include_paths
        .iter()
        .map(|p| config.root_join(p))
        .collect();

    let css = style::compile(&CompileRequest {
        entry: &entry,
        include_paths: &include_paths,
        precision: config.build.precision,
    })?;
    let css = style::autoprefix(&css)?;

    let dest_dir = layout.styles_dir();
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;
    let dest = dest_dir.join(format!("{}.css", config.package.module_name));
    fs::write(&dest, css)
        .with_context(|| format!("Failed to write bundle: {}", dest.display()))?;
    Ok(dest)
}
