//! Clean stage: recreate the output root from scratch.

use std::fs;

use anyhow::{Context, Result};

use crate::pipeline::{BuildContext, Stage};

/// Recursively remove the resolved output root.
///
/// Idempotent: a missing root is success. Establishes the pipeline's sole
/// ownership of the output tree for this run.
pub struct Clean;

impl Stage for Clean {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let root = &ctx.layout.output_root;
        if root.exists() {
            fs::remove_dir_all(root)
                .with_context(|| format!("Failed to clear output root: {}", root.display()))?;
        }
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create output root: {}", root.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    fn context(root: &std::path::Path) -> BuildContext {
        BuildContext::for_tests_at(root, OutputMode::Archive)
    }

    #[test]
    fn test_clean_missing_root_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        Clean.run(&ctx).unwrap();
        assert!(ctx.layout.output_root.is_dir());
    }

    #[test]
    fn test_clean_removes_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let stale = ctx.layout.output_root.join("stale.css");
        fs::create_dir_all(&ctx.layout.output_root).unwrap();
        fs::write(&stale, "old").unwrap();

        Clean.run(&ctx).unwrap();
        assert!(!stale.exists());
        assert!(ctx.layout.output_root.is_dir());
    }
}
