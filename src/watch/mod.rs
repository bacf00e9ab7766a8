//! Watch dispatcher for the development session.
//!
//! Watches the style sources, design tokens, component templates and the
//! compiled output, and maps each debounced change to exactly one
//! invalidation action:
//!
//! ```text
//! style source    → recompile bundle, emit `comments`
//! markup template → evict cache entry, emit `markup`
//! compiled style  → emit `styles` (no recompilation)
//! ```
//!
//! Recompilation failures never terminate the session; they are shown on
//! the watch status line and the next change retries.

mod debouncer;
mod rules;

pub use rules::{WatchClass, classify, watch_roots};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam::channel::Receiver;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;

use crate::config::{OutputLayout, ToolConfig};
use crate::logger;
use crate::serve::Topic;
use debouncer::{ChangeKind, Debouncer};

/// The dispatcher's side effects, factored out so dispatch logic is
/// testable without a live compiler or server.
pub trait ChangeSink: Send {
    /// Recompile the style bundle into the output tree.
    fn recompile_styles(&self) -> anyhow::Result<()>;
    /// Evict one markup template's cache entry.
    fn evict_markup(&self, path: &Path);
    /// Broadcast a topic to connected preview clients.
    fn notify(&self, topic: Topic);
}

/// File watcher plus dispatch loop for one serve session.
pub struct WatchDispatcher {
    notify_rx: Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    shutdown_rx: Receiver<()>,
    config: Arc<ToolConfig>,
    layout: OutputLayout,
    debouncer: Debouncer,
}

impl WatchDispatcher {
    /// Attach watchers to all roots. The watcher starts buffering
    /// immediately, so changes during the initial compile are not lost.
    ///
    /// Missing roots are created before attaching: a root that is absent at
    /// startup (a failed initial compile leaves no styles dir yet) must
    /// still be watched for the rest of the session.
    pub fn new(
        config: Arc<ToolConfig>,
        layout: OutputLayout,
        shutdown_rx: Receiver<()>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = crossbeam::channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        for root in watch_roots(&config, &layout) {
            if let Err(e) = std::fs::create_dir_all(&root) {
                crate::log!("watch"; "cannot create root {}: {}", root.display(), e);
                continue;
            }
            watcher.watch(&root, RecursiveMode::Recursive)?;
            crate::debug!("watch"; "watching {}", root.display());
        }

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            shutdown_rx,
            config,
            layout,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the dispatch loop until shutdown.
    pub fn run(mut self, sink: &dyn ChangeSink) {
        loop {
            crossbeam::select! {
                recv(self.notify_rx) -> msg => match msg {
                    Ok(Ok(event)) => self.debouncer.add_event(&event),
                    Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                    Err(_) => break,
                },
                recv(self.shutdown_rx) -> _ => break,
                default(self.debouncer.sleep_duration()) => {
                    if crate::core::is_shutdown() {
                        break;
                    }
                    if let Some(changes) = self.debouncer.take_if_ready() {
                        dispatch_changes(changes, &self.config, &self.layout, sink);
                    }
                }
            }
        }
        crate::debug!("watch"; "dispatcher stopped");
    }
}

/// Map one debounced batch to invalidation actions.
///
/// Within a batch, style changes collapse to a single recompilation (the
/// bundle is one artifact); markup evictions stay per-path because cache
/// entries are per-file.
fn dispatch_changes(
    changes: FxHashMap<PathBuf, ChangeKind>,
    config: &ToolConfig,
    layout: &OutputLayout,
    sink: &dyn ChangeSink,
) {
    let mut style_changed = false;
    let mut compiled_changed = false;
    let mut markup_paths = Vec::new();

    for (path, kind) in changes {
        let Some(class) = classify(&path, config, layout) else {
            continue;
        };
        crate::debug!("watch"; "{} {}: {}", kind.label(), class.label(), path.display());
        match class {
            WatchClass::StyleSource => style_changed = true,
            WatchClass::MarkupSource => markup_paths.push(path),
            WatchClass::CompiledStyle => compiled_changed = true,
        }
    }

    if style_changed {
        match sink.recompile_styles() {
            Ok(()) => logger::status_success("recompiled styles"),
            Err(e) => logger::status_error("style recompile failed", &format!("{e:#}")),
        }
        sink.notify(Topic::Comments);
    }

    if !markup_paths.is_empty() {
        for path in &markup_paths {
            sink.evict_markup(path);
        }
        logger::status_success("reloaded markup");
        sink.notify(Topic::Markup);
    }

    if compiled_changed {
        sink.notify(Topic::Styles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSink {
        recompiles: AtomicUsize,
        evictions: Mutex<Vec<PathBuf>>,
        topics: Mutex<Vec<Topic>>,
        fail_recompile: bool,
    }

    impl ChangeSink for RecordingSink {
        fn recompile_styles(&self) -> anyhow::Result<()> {
            self.recompiles.fetch_add(1, Ordering::SeqCst);
            if self.fail_recompile {
                anyhow::bail!("invalid nesting")
            }
            Ok(())
        }

        fn evict_markup(&self, path: &Path) {
            self.evictions.lock().push(path.to_path_buf());
        }

        fn notify(&self, topic: Topic) {
            self.topics.lock().push(topic);
        }
    }

    fn fixture() -> (Arc<ToolConfig>, OutputLayout) {
        let mut config = ToolConfig::default();
        config.root = PathBuf::from("/project");
        let config = Arc::new(config);
        let layout = OutputLayout::resolve(&config, OutputMode::Archive);
        (config, layout)
    }

    fn changes(paths: &[&str]) -> FxHashMap<PathBuf, ChangeKind> {
        paths
            .iter()
            .map(|p| (PathBuf::from(p), ChangeKind::Modified))
            .collect()
    }

    #[test]
    fn test_style_change_recompiles_once_and_emits_comments() {
        let (config, layout) = fixture();
        let sink = RecordingSink::default();

        dispatch_changes(
            changes(&["/project/scss/_badge.scss", "/project/scss/_button.scss"]),
            &config,
            &layout,
            &sink,
        );

        assert_eq!(sink.recompiles.load(Ordering::SeqCst), 1);
        assert_eq!(*sink.topics.lock(), vec![Topic::Comments]);
    }

    #[test]
    fn test_markup_change_evicts_and_emits_markup() {
        let (config, layout) = fixture();
        let sink = RecordingSink::default();

        dispatch_changes(
            changes(&["/project/ui/components/badge/markup.html"]),
            &config,
            &layout,
            &sink,
        );

        assert_eq!(sink.recompiles.load(Ordering::SeqCst), 0);
        assert_eq!(
            *sink.evictions.lock(),
            vec![PathBuf::from("/project/ui/components/badge/markup.html")]
        );
        assert_eq!(*sink.topics.lock(), vec![Topic::Markup]);
    }

    #[test]
    fn test_compiled_style_emits_without_recompiling() {
        let (config, layout) = fixture();
        let sink = RecordingSink::default();

        dispatch_changes(
            changes(&["/project/.dist/assets/styles/design-system.css"]),
            &config,
            &layout,
            &sink,
        );

        assert_eq!(sink.recompiles.load(Ordering::SeqCst), 0);
        assert!(sink.evictions.lock().is_empty());
        assert_eq!(*sink.topics.lock(), vec![Topic::Styles]);
    }

    #[test]
    fn test_recompile_failure_still_emits_comments() {
        let (config, layout) = fixture();
        let sink = RecordingSink {
            fail_recompile: true,
            ..RecordingSink::default()
        };

        dispatch_changes(
            changes(&["/project/scss/_broken.scss"]),
            &config,
            &layout,
            &sink,
        );

        // The session stays live and clients still refetch
        assert_eq!(sink.recompiles.load(Ordering::SeqCst), 1);
        assert_eq!(*sink.topics.lock(), vec![Topic::Comments]);
    }

    #[test]
    fn test_missing_roots_created_and_watched_at_startup() {
        // A failed initial compile leaves no styles dir; the session must
        // still observe compiled-style writes once compilation recovers
        let dir = tempfile::tempdir().unwrap();
        let mut config = ToolConfig::default();
        config.root = dir.path().to_path_buf();
        let config = Arc::new(config);
        let layout = OutputLayout::resolve(&config, OutputMode::Archive);
        assert!(!layout.styles_dir().exists());

        let (_tx, rx) = crossbeam::channel::unbounded::<()>();
        let _dispatcher =
            WatchDispatcher::new(Arc::clone(&config), layout.clone(), rx).unwrap();

        for root in watch_roots(&config, &layout) {
            assert!(root.is_dir(), "root not attached: {}", root.display());
        }
    }

    #[test]
    fn test_unrelated_change_is_silent() {
        let (config, layout) = fixture();
        let sink = RecordingSink::default();

        dispatch_changes(changes(&["/project/README.md"]), &config, &layout, &sink);

        assert_eq!(sink.recompiles.load(Ordering::SeqCst), 0);
        assert!(sink.topics.lock().is_empty());
    }
}
