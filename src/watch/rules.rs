//! Watch-path classification.
//!
//! Changed paths fall into three disjoint classes, each mapped to exactly
//! one invalidation action. The compiled-output check runs first: the
//! output tree can live inside the project root, and a compiled css file
//! must never be mistaken for a style source (that would recompile in a
//! loop).

use std::path::Path;

use crate::config::{OutputLayout, ToolConfig};

/// The three watched path classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchClass {
    /// Sass sources and design tokens: recompile the bundle.
    StyleSource,
    /// Component markup templates: evict the cache entry.
    MarkupSource,
    /// Compiled css in the output tree: notify clients, nothing to rebuild.
    CompiledStyle,
}

impl WatchClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StyleSource => "style-source",
            Self::MarkupSource => "markup-source",
            Self::CompiledStyle => "compiled-style",
        }
    }
}

/// Classify one changed path; None for paths the watcher does not act on.
pub fn classify(path: &Path, config: &ToolConfig, layout: &OutputLayout) -> Option<WatchClass> {
    if path.starts_with(layout.styles_dir()) {
        return path
            .extension()
            .is_some_and(|e| e == "css")
            .then_some(WatchClass::CompiledStyle);
    }
    // Anything else inside the output tree is the pipeline's own writing
    if path.starts_with(&layout.output_root) {
        return None;
    }

    if path.starts_with(config.components_dir()) {
        return path
            .extension()
            .is_some_and(|e| e == "html")
            .then_some(WatchClass::MarkupSource);
    }

    if path.starts_with(config.scss_dir()) {
        return matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("scss" | "sass")
        )
        .then_some(WatchClass::StyleSource);
    }

    if path.starts_with(config.design_tokens_dir()) {
        return Some(WatchClass::StyleSource);
    }

    None
}

/// The roots the watcher attaches to.
pub fn watch_roots(config: &ToolConfig, layout: &OutputLayout) -> Vec<std::path::PathBuf> {
    vec![
        config.scss_dir(),
        config.design_tokens_dir(),
        config.components_dir(),
        layout.styles_dir(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;
    use std::path::PathBuf;

    fn fixture() -> (ToolConfig, OutputLayout) {
        let mut config = ToolConfig::default();
        config.root = PathBuf::from("/project");
        let layout = OutputLayout::resolve(&config, OutputMode::Archive);
        (config, layout)
    }

    #[test]
    fn test_style_sources() {
        let (config, layout) = fixture();
        assert_eq!(
            classify(Path::new("/project/scss/_badge.scss"), &config, &layout),
            Some(WatchClass::StyleSource)
        );
        assert_eq!(
            classify(
                Path::new("/project/design-tokens/spacing.yml"),
                &config,
                &layout
            ),
            Some(WatchClass::StyleSource)
        );
    }

    #[test]
    fn test_markup_sources() {
        let (config, layout) = fixture();
        assert_eq!(
            classify(
                Path::new("/project/ui/components/badge/markup.html"),
                &config,
                &layout
            ),
            Some(WatchClass::MarkupSource)
        );
        // Token files under the components tree are not markup sources
        assert_eq!(
            classify(
                Path::new("/project/ui/components/badge/tokens/badge.yml"),
                &config,
                &layout
            ),
            None
        );
    }

    #[test]
    fn test_compiled_styles_take_precedence() {
        let (config, layout) = fixture();
        assert_eq!(
            classify(
                Path::new("/project/.dist/assets/styles/design-system.css"),
                &config,
                &layout
            ),
            Some(WatchClass::CompiledStyle)
        );
        // Other pipeline output is ignored entirely
        assert_eq!(
            classify(Path::new("/project/.dist/scss/_badge.scss"), &config, &layout),
            None
        );
    }

    #[test]
    fn test_unrelated_paths_ignored() {
        let (config, layout) = fixture();
        assert_eq!(
            classify(Path::new("/project/README.md"), &config, &layout),
            None
        );
        assert_eq!(
            classify(Path::new("/project/scss/notes.txt"), &config, &layout),
            None
        );
    }
}
