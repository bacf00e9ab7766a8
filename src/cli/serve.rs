//! `dspack serve` entry point.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use crossbeam::channel;

use crate::config::{OutputLayout, OutputMode, ToolConfig};
use crate::markup::MarkupCache;
use crate::pipeline::stages::compile_bundle;
use crate::serve::{self, PreviewState, ReloadHub, Topic};
use crate::watch::{ChangeSink, WatchDispatcher};
use crate::{log, logger};

/// Watch-driven side effects wired to the live session.
struct LiveSink {
    config: Arc<ToolConfig>,
    layout: OutputLayout,
    cache: Arc<MarkupCache>,
    hub: Arc<ReloadHub>,
}

impl ChangeSink for LiveSink {
    fn recompile_styles(&self) -> Result<()> {
        compile_bundle(&self.config, &self.layout)?;
        Ok(())
    }

    fn evict_markup(&self, path: &Path) {
        self.cache.evict(path);
    }

    fn notify(&self, topic: Topic) {
        self.hub.emit(topic);
    }
}

/// Run the preview server until Ctrl+C.
pub fn run_serve(config: ToolConfig) -> Result<()> {
    let config = Arc::new(config);
    // The preview session serves from the archive-mode output tree
    let layout = OutputLayout::resolve(&config, OutputMode::Archive);
    let cache = Arc::new(MarkupCache::new());

    // Initial compile: a broken stylesheet must not keep the server down,
    // the session exists precisely to iterate on broken edits
    match compile_bundle(&config, &layout) {
        Ok(bundle) => log!("serve"; "compiled {}", bundle.display()),
        Err(e) => logger::status_error("initial style compile failed", &format!("{e:#}")),
    }

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();

    let (ws_port, watch_handle) = if config.serve.watch {
        let hub = Arc::new(ReloadHub::start(config.serve.interface, config.serve.ws_port)?);
        let port = hub.port();
        crate::debug!("reload"; "ws://localhost:{}", port);

        let dispatcher =
            WatchDispatcher::new(Arc::clone(&config), layout.clone(), shutdown_rx.clone())?;
        let sink = LiveSink {
            config: Arc::clone(&config),
            layout: layout.clone(),
            cache: Arc::clone(&cache),
            hub,
        };
        let handle = thread::spawn(move || dispatcher.run(&sink));
        (Some(port), Some(handle))
    } else {
        (None, None)
    };

    let (server, addr) = serve::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server), shutdown_tx);
    log!("serve"; "http://{}", addr);

    let state = PreviewState {
        config: Arc::clone(&config),
        layout,
        cache,
        ws_port,
    };

    for request in server.incoming_requests() {
        if crate::core::is_shutdown() {
            break;
        }
        if let Err(e) = serve::handle_request(request, &state) {
            log!("serve"; "request error: {e}");
        }
    }

    wait_for_dispatcher(watch_handle);
    Ok(())
}

/// Wait for the watch dispatcher to stop (max 2 seconds).
fn wait_for_dispatcher(handle: Option<thread::JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}
