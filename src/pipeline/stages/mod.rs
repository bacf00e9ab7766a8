//! Concrete packaging stages.
//!
//! The order assembled here is significant and fixed: no stage may be
//! skipped or reordered at runtime.

mod archive;
mod banner;
mod clean;
mod copy;
mod manifest;
mod metadata;
mod minify;
mod readme;
mod styles;

pub use archive::Archive;
pub use banner::PrependVersionBanner;
pub use clean::Clean;
pub use copy::{CopyAssetTree, CopyComponentTokens, CopyStatic};
pub use manifest::GenerateManifest;
pub use metadata::RewriteMetadata;
pub use minify::MinifyStyleBundle;
pub use readme::AnnotateReadme;
pub use styles::{CompileStyleBundle, compile_bundle};

use super::Stage;
use crate::config::ToolConfig;

/// Assemble the full packaging pipeline for one run.
pub fn packaging_stages(config: &ToolConfig) -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(Clean),
        Box::new(CopyStatic),
        Box::new(RewriteMetadata),
        Box::new(CopyAssetTree::full_tree(config.scss_dir(), "scss")),
        Box::new(CopyAssetTree::full_tree(
            config.root_join(&config.paths.icons),
            "assets/icons",
        )),
        Box::new(CopyAssetTree::full_tree(
            config.root_join(&config.paths.fonts),
            "assets/fonts",
        )),
        Box::new(CopyAssetTree::with_globs(
            config.root_join(&config.paths.images),
            "assets/images",
            config.assets.image_globs.clone(),
        )),
        Box::new(CopyAssetTree::full_tree(
            config.root_join(&config.paths.swatches),
            "swatches",
        )),
        Box::new(CopyAssetTree::design_tokens(config.design_tokens_dir())),
        Box::new(CopyComponentTokens),
        Box::new(CompileStyleBundle::packaged()),
        Box::new(MinifyStyleBundle),
        Box::new(PrependVersionBanner),
        Box::new(AnnotateReadme),
        Box::new(GenerateManifest),
        Box::new(Archive),
    ]
}
