//! Output root resolution (the build's path resolver).
//!
//! Two output shapes exist, selected by the `--npm` flag:
//! - `Package`: full npm-style module tree, complete design-token tree
//! - `Archive`: zip-oriented tree with a filtered token subset (the archive
//!   has a hard upload size ceiling)

use std::path::{Path, PathBuf};

use super::ToolConfig;

/// Output mode flag controlling root location and token-tree filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Package,
    Archive,
}

impl OutputMode {
    /// Mode label for logging.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Archive => "archive",
        }
    }
}

/// Resolved absolute output locations for one build run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub mode: OutputMode,
    /// The output root exclusively owned by the pipeline during a run.
    pub output_root: PathBuf,
    /// Public downloads location receiving the archive copy.
    pub downloads_dir: PathBuf,
}

impl OutputLayout {
    /// Resolve output roots against the project root.
    pub fn resolve(config: &ToolConfig, mode: OutputMode) -> Self {
        let output_root = match mode {
            OutputMode::Package => config.root_join(&config.build.package_dir),
            OutputMode::Archive => config.root_join(&config.build.dist_dir),
        };
        Self {
            mode,
            output_root,
            downloads_dir: config.root_join(&config.build.downloads_dir),
        }
    }

    /// Compiled stylesheet destination inside the output root.
    pub fn styles_dir(&self) -> PathBuf {
        self.output_root.join("assets/styles")
    }

    /// Stylesheet-source destination inside the output root.
    pub fn scss_dir(&self) -> PathBuf {
        self.output_root.join("scss")
    }

    /// Design-token destination inside the output root.
    pub fn design_tokens_dir(&self) -> PathBuf {
        self.output_root.join("design-tokens")
    }

    /// Per-component token destination inside the output root.
    pub fn ui_dir(&self) -> PathBuf {
        self.output_root.join("ui")
    }

    /// Whether a design-token file is included in this mode.
    ///
    /// Package mode ships the full token tree. Archive mode keeps only
    /// token-definition and stylesheet-source files.
    pub fn includes_token_file(&self, path: &Path) -> bool {
        match self.mode {
            OutputMode::Package => true,
            OutputMode::Archive => matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yml" | "yaml" | "json" | "scss" | "sass")
            ),
        }
    }
}
