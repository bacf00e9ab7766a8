//! Process-wide cache of loaded component markup generators.
//!
//! Generators are loaded lazily into a registry keyed by resolved source
//! path. A file-change event evicts exactly that entry, so the next markup
//! request recomputes from the modified source. Eviction happens before the
//! replacement load is attempted: a request during a broken edit fails with
//! the load error instead of serving the stale generator.

mod template;

pub use template::MarkupTemplate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::ToolConfig;
use crate::utils::path::normalize_path;

/// Path-keyed registry of loaded markup templates.
///
/// Mutation discipline: an eviction for path P must be visible to the next
/// lookup for P. The mutex around the map is all that is needed.
pub struct MarkupCache {
    entries: Mutex<FxHashMap<PathBuf, Arc<MarkupTemplate>>>,
}

impl MarkupCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Get the cached template for a source path, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<MarkupTemplate>> {
        let key = cache_key(path);

        if let Some(entry) = self.entries.lock().get(&key) {
            return Ok(Arc::clone(entry));
        }

        // Load outside the lock; a racing load of the same file produces
        // the same template, last insert wins.
        let template = Arc::new(MarkupTemplate::load(&key)?);
        self.entries.lock().insert(key, Arc::clone(&template));
        Ok(template)
    }

    /// Evict the entry for one source path. Returns true if it was cached.
    pub fn evict(&self, path: &Path) -> bool {
        self.entries.lock().remove(&cache_key(path)).is_some()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Resolve and render markup for a component variant.
    pub fn markup_for(
        &self,
        config: &ToolConfig,
        component: &str,
        variant: &str,
    ) -> Result<String> {
        let path = component_source(config, component)?;
        let template = self.get_or_load(&path)?;
        match template.variant(variant) {
            Some(markup) => Ok(markup.to_string()),
            None => bail!("component '{}' has no variant '{}'", component, variant),
        }
    }
}

/// Cache key for a template source path.
///
/// The parent directory is canonicalized and the file name re-joined, so
/// load and evict derive the same key even after the file itself has been
/// removed. Canonicalizing the full path would fail once the file is gone
/// and fall back to the unresolved form, missing entries that were keyed
/// through a symlinked root.
fn cache_key(path: &Path) -> PathBuf {
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(parent) = parent.canonicalize()
    {
        return parent.join(name);
    }
    normalize_path(path)
}

/// Source template path for a component id.
///
/// Component ids come from URLs; reject anything that is not a plain
/// directory name.
fn component_source(config: &ToolConfig, component: &str) -> Result<PathBuf> {
    if component.is_empty()
        || component
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
    {
        bail!("invalid component id: '{}'", component);
    }
    Ok(config.components_dir().join(component).join("markup.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(markup: &str) -> (tempfile::TempDir, ToolConfig, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let comp = dir.path().join("ui/components/button");
        fs::create_dir_all(&comp).unwrap();
        let path = comp.join("markup.html");
        fs::write(&path, markup).unwrap();

        let mut config = ToolConfig::default();
        config.root = dir.path().to_path_buf();
        (dir, config, path)
    }

    #[test]
    fn test_lazy_load_and_cache() {
        let (_dir, config, path) = fixture("<button>Save</button>\n");
        let cache = MarkupCache::new();
        assert_eq!(cache.len(), 0);

        let markup = cache.markup_for(&config, "button", "default").unwrap();
        assert_eq!(markup, "<button>Save</button>\n");
        assert_eq!(cache.len(), 1);

        // Second fetch is served from the cache entry
        let again = cache.get_or_load(&path).unwrap();
        assert_eq!(again.variant("default").unwrap(), "<button>Save</button>\n");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_reflects_new_content() {
        let (_dir, config, path) = fixture("<button>Old</button>\n");
        let cache = MarkupCache::new();

        let old = cache.markup_for(&config, "button", "default").unwrap();
        assert!(old.contains("Old"));

        // Source changes; without eviction the stale entry would be served
        fs::write(&path, "<button>New</button>\n").unwrap();
        assert!(cache.evict(&path));

        let new = cache.markup_for(&config, "button", "default").unwrap();
        assert!(new.contains("New"));
    }

    #[test]
    fn test_evict_uncached_path() {
        let (_dir, _config, path) = fixture("<button>x</button>\n");
        let cache = MarkupCache::new();
        assert!(!cache.evict(&path));
    }

    #[test]
    fn test_broken_edit_fails_instead_of_serving_stale() {
        let (_dir, config, path) = fixture("<button>Ok</button>\n");
        let cache = MarkupCache::new();
        cache.markup_for(&config, "button", "default").unwrap();

        // Broken edit: named variant with no markup
        fs::write(&path, "<!-- @variant: broken -->\n\n").unwrap();
        cache.evict(&path);

        assert!(cache.markup_for(&config, "button", "default").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_evict_removed_file_through_symlinked_root() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real/components/button");
        fs::create_dir_all(&real).unwrap();
        let path = real.join("markup.html");
        fs::write(&path, "<button>x</button>\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let linked = dir.path().join("link/components/button/markup.html");
        let cache = MarkupCache::new();
        cache.get_or_load(&linked).unwrap();
        assert_eq!(cache.len(), 1);

        // The source disappears before the eviction event is processed;
        // the entry must still be found under the same key
        fs::remove_file(&path).unwrap();
        assert!(cache.evict(&linked));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_rejects_path_traversal_component_id() {
        let (_dir, config, _path) = fixture("<button>x</button>\n");
        let cache = MarkupCache::new();
        assert!(cache.markup_for(&config, "../secret", "default").is_err());
        assert!(cache.markup_for(&config, "", "default").is_err());
    }
}
