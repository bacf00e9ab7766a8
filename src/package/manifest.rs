//! Component manifest: a structured description of all packaged components.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ToolConfig;
use crate::markup::MarkupTemplate;

/// Description of one packaged component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentDescriptor {
    /// Component identifier (directory name under the components root).
    pub id: String,
    /// Source path relative to the project root.
    pub path: String,
    /// Markup variant names, in template order.
    pub variants: Vec<String>,
    /// Per-component token files (relative to the component directory).
    pub tokens: Vec<String>,
}

/// Describe all components under the components tree.
///
/// A component is any direct subdirectory containing a `markup.html`
/// template. A missing components tree is a valid empty result: the
/// manifest then describes zero components.
pub fn describe_components(config: &ToolConfig) -> Result<Vec<ComponentDescriptor>> {
    let components_dir = config.components_dir();
    if !components_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<_> = fs::read_dir(&components_dir)
        .with_context(|| format!("Failed to read {}", components_dir.display()))?
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut components = Vec::new();
    for entry in entries {
        let dir = entry.path();
        let markup_path = dir.join("markup.html");
        if !markup_path.is_file() {
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();
        let template = MarkupTemplate::load(&markup_path)?;

        components.push(ComponentDescriptor {
            id,
            path: crate::utils::path::relative_to(&dir, config.get_root())
                .to_string_lossy()
                .into_owned(),
            variants: template.variant_names(),
            tokens: collect_token_files(&dir)?,
        });
    }

    Ok(components)
}

/// Token files under a component's `tokens/` directory, sorted.
fn collect_token_files(component_dir: &Path) -> Result<Vec<String>> {
    let tokens_dir = component_dir.join("tokens");
    if !tokens_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<String> = fs::read_dir(&tokens_dir)
        .with_context(|| format!("Failed to read {}", tokens_dir.display()))?
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| format!("tokens/{}", e.file_name().to_string_lossy()))
        .collect();
    files.sort();
    Ok(files)
}
