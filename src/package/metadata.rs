//! Package metadata (package.json) reading and distribution rewrite.
//!
//! The source record is read once and never mutated in place; the
//! distribution stage produces a derived copy with the package identity
//! renamed to its published form and internal-only fields removed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

/// Fields removed from the distributed metadata, in addition to the
/// project-specific flag field from config.
pub const STRIPPED_FIELDS: &[&str] = &[
    "scripts",
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "engines",
];

/// Package metadata record, read once from the source metadata file.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    raw: Map<String, Value>,
}

impl PackageMetadata {
    /// Read and parse the source metadata file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Failed to parse metadata: {}", path.display()))
    }

    /// Parse metadata from a JSON string.
    pub fn from_str(content: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(content)?;

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("metadata is missing a 'name' field"))?
            .to_string();
        let version = raw
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("metadata is missing a 'version' field"))?
            .to_string();

        Ok(Self { name, version, raw })
    }

    /// Produce the distributed form: published name, stripped fields.
    ///
    /// The source record is left untouched; key order of the remaining
    /// fields is preserved.
    pub fn rewritten(&self, published_name: &str, flag_field: &str) -> Map<String, Value> {
        let mut out = self.raw.clone();
        out.insert("name".into(), Value::String(published_name.to_string()));
        for field in STRIPPED_FIELDS {
            out.remove(*field);
        }
        out.remove(flag_field);
        out
    }

    /// Serialize a metadata map with stable 2-space indentation.
    pub fn to_pretty_json(map: &Map<String, Value>) -> Result<String> {
        let mut out = serde_json::to_string_pretty(map)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
  "name": "design-system-internal",
  "version": "2.4.1",
  "license": "MIT",
  "scripts": { "build": "gulp dist" },
  "dependencies": { "left-pad": "^1.0.0" },
  "devDependencies": { "gulp": "^4.0.0" },
  "optionalDependencies": {},
  "engines": { "node": ">=10" },
  "internalRelease": true
}"#;

    #[test]
    fn test_load_name_and_version() {
        let meta = PackageMetadata::from_str(SOURCE).unwrap();
        assert_eq!(meta.name, "design-system-internal");
        assert_eq!(meta.version, "2.4.1");
    }

    #[test]
    fn test_rewritten_strips_internal_fields() {
        let meta = PackageMetadata::from_str(SOURCE).unwrap();
        let out = meta.rewritten("@acme/design-system", "internalRelease");

        assert_eq!(out["name"], "@acme/design-system");
        assert_eq!(out["version"], "2.4.1");
        assert_eq!(out["license"], "MIT");
        for field in STRIPPED_FIELDS {
            assert!(!out.contains_key(*field), "field {field} not stripped");
        }
        assert!(!out.contains_key("internalRelease"));
    }

    #[test]
    fn test_rewritten_tolerates_missing_fields() {
        let meta =
            PackageMetadata::from_str(r#"{"name": "x", "version": "1.0.0"}"#).unwrap();
        let out = meta.rewritten("@acme/x", "internalRelease");
        assert_eq!(out["name"], "@acme/x");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_source_not_mutated() {
        let meta = PackageMetadata::from_str(SOURCE).unwrap();
        let _ = meta.rewritten("@acme/design-system", "internalRelease");
        // A second rewrite still sees the original record
        let out = meta.rewritten("@other/name", "internalRelease");
        assert_eq!(out["name"], "@other/name");
        assert_eq!(meta.name, "design-system-internal");
    }

    #[test]
    fn test_pretty_json_two_space_indent() {
        let meta =
            PackageMetadata::from_str(r#"{"name": "x", "version": "1.0.0"}"#).unwrap();
        let out = meta.rewritten("@acme/x", "internalRelease");
        let json = PackageMetadata::to_pretty_json(&out).unwrap();
        assert!(json.starts_with("{\n  \"name\""));
        assert!(json.ends_with("}\n"));
    }
}
