//! Tool configuration management for `dspack.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[package]` | Package identity (metadata file, published name)    |
//! | `[paths]`   | Source tree locations (scss, tokens, components)    |
//! | `[assets]`  | Static file list and curated image globs            |
//! | `[build]`   | Output roots, style entry, include paths, precision |
//! | `[serve]`   | Development server (interface, port, watch)         |

mod layout;
mod section;

pub use layout::{OutputLayout, OutputMode};
pub use section::{AssetsConfig, BuildConfig, PackageConfig, PathsConfig, ServeConfig};

use crate::{
    cli::{Cli, Commands},
    log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing dspack.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Package identity settings
    #[serde(default)]
    pub package: PackageConfig,

    /// Source tree locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Static file and image selection
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            package: PackageConfig::default(),
            paths: PathsConfig::default(),
            assets: AssetsConfig::default(),
            build: BuildConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if !exists {
            log!(
                "error";
                "Config file '{}' not found in this or any parent directory.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);

        Ok(config)
    }

    /// Resolve config file path by searching upward from cwd.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if cli.config.is_absolute() {
            let exists = cli.config.exists();
            return Ok((cli.config.clone(), exists));
        }

        let mut dir = cwd.as_path();
        loop {
            let candidate = dir.join(&cli.config);
            if candidate.is_file() {
                return Ok((candidate, true));
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Ok((cwd.join(&cli.config), false)),
            }
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.root = normalize_path(&root);
        self.config_path = normalize_path(&self.config_path);

        self.apply_command_options(cli);
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { verbose, .. } => crate::logger::set_verbose(*verbose),
            Commands::Serve {
                interface,
                port,
                watch,
                verbose,
            } => {
                crate::logger::set_verbose(*verbose);
                if let Some(interface) = interface {
                    self.serve.interface = *interface;
                }
                if let Some(port) = port {
                    self.serve.port = *port;
                }
                if let Some(watch) = watch {
                    self.serve.watch = *watch;
                }
            }
        }
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                bail!("Aborted due to unknown config fields");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        Ok(input == "y" || input == "yes")
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute path of the package metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.root_join(&self.package.metadata)
    }

    /// Absolute path of the scss source tree.
    pub fn scss_dir(&self) -> PathBuf {
        self.root_join(&self.paths.scss)
    }

    /// Absolute path of the design-token tree.
    pub fn design_tokens_dir(&self) -> PathBuf {
        self.root_join(&self.paths.design_tokens)
    }

    /// Absolute path of the components tree.
    pub fn components_dir(&self) -> PathBuf {
        self.root_join(&self.paths.components)
    }
}

// ============================================================================
// tests
// ============================================================================
