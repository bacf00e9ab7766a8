//! Copy stages: static files, asset trees, per-component tokens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glob::Pattern;

use crate::pipeline::{BuildContext, Stage};
use crate::utils::path::{copy_with_parents, relative_to, walk_files};

// ============================================================================
// CopyStatic
// ============================================================================

/// Copy the explicit, fixed list of root-level files into the output root.
///
/// Fails if any of the listed source files is unreadable.
pub struct CopyStatic;

impl Stage for CopyStatic {
    fn name(&self) -> &'static str {
        "copy-static"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        for file in &ctx.config.assets.static_files {
            let source = ctx.config.root_join(file);
            let dest = ctx.layout.output_root.join(file);
            copy_with_parents(&source, &dest)?;
        }
        Ok(())
    }
}

// ============================================================================
// CopyAssetTree
// ============================================================================

/// Generic tree copy parameterized by glob patterns, a base directory for
/// relative-path preservation, and a destination subdirectory.
///
/// The design-token variant additionally applies the output mode's token
/// filter: package mode ships every file, archive mode keeps only
/// token-definition and stylesheet-source files.
pub struct CopyAssetTree {
    base: PathBuf,
    dest: &'static str,
    globs: Vec<String>,
    token_filtered: bool,
}

impl CopyAssetTree {
    /// Copy every file under `base` into `dest`.
    pub fn full_tree(base: PathBuf, dest: &'static str) -> Self {
        Self {
            base,
            dest,
            globs: Vec::new(),
            token_filtered: false,
        }
    }

    /// Copy only files matching one of `globs` (relative to `base`).
    pub fn with_globs(base: PathBuf, dest: &'static str, globs: Vec<String>) -> Self {
        Self {
            base,
            dest,
            globs,
            token_filtered: false,
        }
    }

    /// The design-token tree, filtered per output mode.
    pub fn design_tokens(base: PathBuf) -> Self {
        Self {
            base,
            dest: "design-tokens",
            globs: Vec::new(),
            token_filtered: true,
        }
    }

    fn matches(&self, rel: &std::path::Path, patterns: &[Pattern]) -> bool {
        patterns.is_empty() || patterns.iter().any(|p| p.matches_path(rel))
    }
}

impl Stage for CopyAssetTree {
    fn name(&self) -> &'static str {
        "copy-assets"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        if !self.base.is_dir() {
            // Optional trees (e.g. swatches) may be absent
            crate::debug!("build"; "skipping missing tree: {}", self.base.display());
            return Ok(());
        }

        let patterns = self
            .globs
            .iter()
            .map(|g| Pattern::new(g).with_context(|| format!("Invalid glob: {g}")))
            .collect::<Result<Vec<_>>>()?;

        let dest_root = ctx.layout.output_root.join(self.dest);
        for source in walk_files(&self.base) {
            let rel = relative_to(&source, &self.base);
            if !self.matches(&rel, &patterns) {
                continue;
            }
            if self.token_filtered && !ctx.layout.includes_token_file(&rel) {
                continue;
            }
            copy_with_parents(&source, &dest_root.join(&rel))?;
        }
        Ok(())
    }
}

// ============================================================================
// CopyComponentTokens
// ============================================================================

/// Copy per-component token files into a parallel `ui/` tree, preserving
/// the sub-path beneath the components root.
pub struct CopyComponentTokens;

impl Stage for CopyComponentTokens {
    fn name(&self) -> &'static str {
        "copy-component-tokens"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let components_dir = ctx.config.components_dir();
        if !components_dir.is_dir() {
            return Ok(());
        }

        let dest_root = ctx.layout.ui_dir();
        for source in walk_files(&components_dir) {
            let rel = relative_to(&source, &components_dir);
            // Token files live under <component>/tokens/
            let is_token = rel
                .components()
                .any(|c| c.as_os_str() == "tokens");
            if !is_token {
                continue;
            }
            copy_with_parents(&source, &dest_root.join(&rel))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;
    use std::fs;

    #[test]
    fn test_copy_static_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        // LICENSE.txt / README-dist.md do not exist
        assert!(CopyStatic.run(&ctx).is_err());
    }

    #[test]
    fn test_copy_static_copies_listed_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE.txt"), "license").unwrap();
        fs::write(dir.path().join("README-dist.md"), "readme").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        CopyStatic.run(&ctx).unwrap();

        assert!(ctx.layout.output_root.join("LICENSE.txt").is_file());
        assert!(ctx.layout.output_root.join("README-dist.md").is_file());
    }

    #[test]
    fn test_copy_tree_preserves_relative_structure() {
        let dir = tempfile::tempdir().unwrap();
        let scss = dir.path().join("scss");
        fs::create_dir_all(scss.join("vendor")).unwrap();
        fs::write(scss.join("index.scss"), "@import \"vendor/normalize\";\n").unwrap();
        fs::write(scss.join("vendor/normalize.scss"), "html { margin: 0; }\n").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        CopyAssetTree::full_tree(scss, "scss").run(&ctx).unwrap();

        let out = ctx.layout.scss_dir();
        assert!(out.join("index.scss").is_file());
        assert!(out.join("vendor/normalize.scss").is_file());
    }

    #[test]
    fn test_copy_tree_glob_subset() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("assets/images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("logo.png"), "png").unwrap();
        fs::write(images.join("screenshot.png"), "png").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        CopyAssetTree::with_globs(images, "assets/images", vec!["logo*.png".into()])
            .run(&ctx)
            .unwrap();

        let out = ctx.layout.output_root.join("assets/images");
        assert!(out.join("logo.png").is_file());
        assert!(!out.join("screenshot.png").exists());
    }

    #[test]
    fn test_design_tokens_filtered_in_archive_mode() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = dir.path().join("design-tokens");
        fs::create_dir_all(&tokens).unwrap();
        fs::write(tokens.join("a.yml"), "a: 1\n").unwrap();
        fs::write(tokens.join("b.scss"), "$b: 1;\n").unwrap();
        fs::write(tokens.join("c.png"), "png").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        CopyAssetTree::design_tokens(tokens).run(&ctx).unwrap();

        let out = ctx.layout.design_tokens_dir();
        assert!(out.join("a.yml").is_file());
        assert!(out.join("b.scss").is_file());
        assert!(!out.join("c.png").exists());
    }

    #[test]
    fn test_design_tokens_complete_in_package_mode() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = dir.path().join("design-tokens");
        fs::create_dir_all(&tokens).unwrap();
        fs::write(tokens.join("a.yml"), "a: 1\n").unwrap();
        fs::write(tokens.join("b.scss"), "$b: 1;\n").unwrap();
        fs::write(tokens.join("c.png"), "png").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Package);
        CopyAssetTree::design_tokens(tokens).run(&ctx).unwrap();

        let out = ctx.layout.design_tokens_dir();
        assert!(out.join("a.yml").is_file());
        assert!(out.join("b.scss").is_file());
        assert!(out.join("c.png").is_file());
    }

    #[test]
    fn test_component_tokens_parallel_tree() {
        let dir = tempfile::tempdir().unwrap();
        let badge = dir.path().join("ui/components/badge");
        fs::create_dir_all(badge.join("tokens")).unwrap();
        fs::write(badge.join("tokens/badge.yml"), "bg: gray\n").unwrap();
        fs::write(badge.join("markup.html"), "<span/>\n").unwrap();

        let ctx = BuildContext::for_tests_at(dir.path(), OutputMode::Archive);
        CopyComponentTokens.run(&ctx).unwrap();

        let out = ctx.layout.ui_dir();
        assert!(out.join("badge/tokens/badge.yml").is_file());
        // Markup templates are not part of the token copy
        assert!(!out.join("badge/markup.html").exists());
    }
}
