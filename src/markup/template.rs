//! Component markup templates.
//!
//! A template file holds one or more markup variants. Content before the
//! first marker is the `default` variant; each
//! `<!-- @variant: name -->` marker starts a new named variant.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Marker prefix introducing a named variant section.
const VARIANT_MARKER: &str = "<!-- @variant:";

/// Parsed markup template for one component source file.
#[derive(Debug, Clone)]
pub struct MarkupTemplate {
    /// Variant name → markup, in file order.
    variants: Vec<(String, String)>,
}

impl MarkupTemplate {
    /// Load and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup template: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse markup template: {}", path.display()))
    }

    /// Parse template content into variant sections.
    pub fn parse(content: &str) -> Result<Self> {
        let mut variants: Vec<(String, String)> = Vec::new();
        let mut current_name = String::from("default");
        let mut current_body = String::new();

        for line in content.lines() {
            if let Some(name) = parse_marker(line) {
                push_variant(&mut variants, &current_name, &current_body)?;
                current_name = name;
                current_body = String::new();
            } else {
                current_body.push_str(line);
                current_body.push('\n');
            }
        }
        push_variant(&mut variants, &current_name, &current_body)?;

        if variants.is_empty() {
            bail!("template defines no markup");
        }
        Ok(Self { variants })
    }

    /// Markup for a named variant, if defined.
    pub fn variant(&self, name: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_str())
    }

    /// Variant names in file order.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Extract the variant name from a marker line, if this line is one.
fn parse_marker(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix(VARIANT_MARKER)?;
    let name = rest.strip_suffix("-->")?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Record a finished section, skipping an empty leading default section.
fn push_variant(
    variants: &mut Vec<(String, String)>,
    name: &str,
    body: &str,
) -> Result<()> {
    if body.trim().is_empty() {
        // Empty default section before the first marker is fine;
        // an explicitly named empty variant is an authoring error.
        if name != "default" || !variants.is_empty() {
            bail!("variant '{}' has no markup", name);
        }
        return Ok(());
    }
    if variants.iter().any(|(n, _)| n == name) {
        bail!("duplicate variant '{}'", name);
    }
    variants.push((name.to_string(), body.to_string()));
    Ok(())
}
