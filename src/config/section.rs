//! Configuration section definitions.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

// ============================================================================
// [package]
// ============================================================================

/// Package identity settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package metadata file, relative to the project root.
    pub metadata: PathBuf,

    /// Published package name written into the distributed metadata.
    pub published_name: String,

    /// Human-readable product name used in version banners and headings.
    pub display_name: String,

    /// Canonical distribution base name (css bundle and archive naming).
    pub module_name: String,

    /// Project-specific flag field stripped from the distributed metadata.
    pub flag_field: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from("package.json"),
            published_name: "@dspack/design-system".into(),
            display_name: "Design System".into(),
            module_name: "design-system".into(),
            flag_field: "internalRelease".into(),
        }
    }
}

// ============================================================================
// [paths]
// ============================================================================

/// Source tree locations, relative to the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Component tree (markup templates and per-component tokens).
    pub components: PathBuf,

    /// Stylesheet source tree.
    pub scss: PathBuf,

    /// Vendor-supplied sources inside the scss tree (excluded from banners).
    pub scss_vendor: PathBuf,

    /// Design-token tree.
    pub design_tokens: PathBuf,

    /// Color swatch files.
    pub swatches: PathBuf,

    /// Icon sprite/source tree.
    pub icons: PathBuf,

    /// Font files (including license).
    pub fonts: PathBuf,

    /// Image sources (a curated subset is packaged, see [assets]).
    pub images: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            components: PathBuf::from("ui/components"),
            scss: PathBuf::from("scss"),
            scss_vendor: PathBuf::from("vendor"),
            design_tokens: PathBuf::from("design-tokens"),
            swatches: PathBuf::from("swatches"),
            icons: PathBuf::from("assets/icons"),
            fonts: PathBuf::from("assets/fonts"),
            images: PathBuf::from("assets/images"),
        }
    }
}

// ============================================================================
// [assets]
// ============================================================================

/// Static file list and curated image globs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Explicit root-level files copied into the output root.
    pub static_files: Vec<String>,

    /// Distribution README source (renamed to README.md in the output).
    pub readme_source: String,

    /// Globs (relative to the images tree) selecting the packaged subset.
    pub image_globs: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_files: vec!["LICENSE.txt".into(), "README-dist.md".into()],
            readme_source: "README-dist.md".into(),
            image_globs: vec!["logo*.png".into(), "logo*.svg".into(), "favicon*".into()],
        }
    }
}

// ============================================================================
// [build]
// ============================================================================

/// Build settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output root for package-distribution mode, relative to project root.
    pub package_dir: PathBuf,

    /// Output root for archive-only mode, relative to project root.
    pub dist_dir: PathBuf,

    /// Public downloads location receiving the archive copy.
    pub downloads_dir: PathBuf,

    /// Entry stylesheet, relative to the scss tree.
    pub entry: PathBuf,

    /// Additional include directories for the style engine.
    pub include_paths: Vec<PathBuf>,

    /// Numeric precision for compiled style values.
    pub precision: u8,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            package_dir: PathBuf::from(".npm"),
            dist_dir: PathBuf::from(".dist"),
            downloads_dir: PathBuf::from("public/downloads"),
            entry: PathBuf::from("index.scss"),
            include_paths: vec![PathBuf::from("node_modules")],
            precision: 10,
        }
    }
}

// ============================================================================
// [serve]
// ============================================================================

/// Development server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port for the preview endpoint.
    pub port: u16,

    /// WebSocket port for the change-notification channel.
    pub ws_port: u16,

    /// Enable file watching.
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4000,
            ws_port: 35729,
            watch: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_defaults() {
        let paths = PathsConfig::default();
        assert_eq!(paths.scss, PathBuf::from("scss"));
        assert_eq!(paths.components, PathBuf::from("ui/components"));
    }

    #[test]
    fn test_build_defaults() {
        let build = BuildConfig::default();
        assert_eq!(build.precision, 10);
        assert_eq!(build.entry, PathBuf::from("index.scss"));
    }
}
