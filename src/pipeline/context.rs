//! Shared state threaded through the pipeline stages.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{OutputLayout, OutputMode, ToolConfig};
use crate::package::PackageMetadata;

/// Immutable context for one build run.
///
/// Holds the configuration, the resolved output layout, and the package
/// metadata read once at run start. Stages only read from the context; all
/// of their mutation happens on the filesystem under the output root.
pub struct BuildContext {
    pub config: Arc<ToolConfig>,
    pub layout: OutputLayout,
    pub metadata: PackageMetadata,
}

impl BuildContext {
    /// Resolve a context for one run: read metadata, compute output roots.
    pub fn resolve(config: Arc<ToolConfig>, mode: OutputMode) -> Result<Self> {
        let metadata = PackageMetadata::load(&config.metadata_path())?;
        let layout = OutputLayout::resolve(&config, mode);
        Ok(Self {
            config,
            layout,
            metadata,
        })
    }

    /// Version banner for CSS files: `/*! <name> <version> */`.
    pub fn css_banner(&self) -> String {
        format!(
            "/*! {} {} */",
            self.config.package.display_name, self.metadata.version
        )
    }

    /// Version banner for Sass sources: `// <name> <version>`.
    pub fn scss_banner(&self) -> String {
        format!(
            "// {} {}",
            self.config.package.display_name, self.metadata.version
        )
    }

    /// Archive file name: `<module-name>-<sanitized-version>.zip`.
    pub fn archive_name(&self) -> String {
        format!(
            "{}-{}.zip",
            self.config.package.module_name,
            crate::utils::version::sanitize_version(&self.metadata.version)
        )
    }

    /// Context over defaults for runner tests (no filesystem access).
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::for_tests_at(std::path::Path::new(""), OutputMode::Archive)
    }

    /// Context rooted at a test directory.
    #[cfg(test)]
    pub fn for_tests_at(root: &std::path::Path, mode: OutputMode) -> Self {
        let mut config = ToolConfig::default();
        config.root = root.to_path_buf();
        let config = Arc::new(config);
        let layout = OutputLayout::resolve(&config, mode);
        Self {
            config,
            layout,
            metadata: PackageMetadata::from_str(r#"{"name":"test","version":"0.0.0"}"#)
                .expect("static metadata"),
        }
    }
}
