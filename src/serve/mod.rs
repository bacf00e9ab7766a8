//! Development preview server.
//!
//! Serves a component index, per-variant markup previews, the extracted
//! style-guide comments, and the compiled output tree, with a WebSocket
//! change-notification channel for connected preview clients.

pub mod providers;
pub mod reload;
mod response;

pub use reload::{ReloadHub, Topic};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tiny_http::{Request, Server};

use crate::config::{OutputLayout, ToolConfig};
use crate::markup::MarkupCache;
use crate::package::describe_components;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    crate::log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Shared state for the request handlers.
pub struct PreviewState {
    pub config: Arc<ToolConfig>,
    pub layout: OutputLayout,
    pub cache: Arc<MarkupCache>,
    /// Actual notification port, None when watch is disabled.
    pub ws_port: Option<u16>,
}

/// Handle a single HTTP request.
pub fn handle_request(request: Request, state: &PreviewState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_not_found(request);
    }

    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");

    match path {
        "/" => respond_index(request, state),
        "/comments" => respond_comments(request, state),
        _ if path.starts_with("/markup/") => respond_markup(request, state, path),
        _ => respond_static(request, state, path),
    }
}

/// Component index page.
fn respond_index(request: Request, state: &PreviewState) -> Result<()> {
    let components = match describe_components(&state.config) {
        Ok(components) => components,
        Err(e) => return response::respond_error(request, &e),
    };

    let mut items = String::new();
    for component in &components {
        items.push_str(&format!("<li><strong>{}</strong><ul>", component.id));
        for variant in &component.variants {
            items.push_str(&format!(
                "<li><a href=\"/markup/{}/{}\">{}</a></li>",
                component.id, variant, variant
            ));
        }
        items.push_str("</ul></li>");
    }

    let body = preview_page(
        &state.config.package.display_name,
        &format!(
            "<h1>{}</h1><p><a href=\"/comments\">style-guide comments</a></p><ul>{items}</ul>",
            state.config.package.display_name
        ),
        state,
    );
    response::respond_html(request, body)
}

/// Style-guide comments as JSON.
fn respond_comments(request: Request, state: &PreviewState) -> Result<()> {
    let mut outcome = None;
    providers::fetch_comments(&state.config, |result| outcome = Some(result));
    match outcome.expect("provider invokes callback") {
        Ok(blocks) => response::respond_json(request, serde_json::to_string_pretty(&blocks)?),
        Err(e) => response::respond_error(request, &e),
    }
}

/// Rendered markup preview for `/markup/<component>/<variant>`.
fn respond_markup(request: Request, state: &PreviewState, path: &str) -> Result<()> {
    let rest = &path["/markup/".len()..];
    let mut parts = rest.splitn(2, '/');
    let component = parts.next().unwrap_or_default();
    let variant = parts.next().unwrap_or("default");

    let mut outcome = None;
    providers::fetch_markup(&state.config, &state.cache, component, variant, |result| {
        outcome = Some(result);
    });
    match outcome.expect("provider invokes callback") {
        Ok(markup) => {
            let body = preview_page(&format!("{component} / {variant}"), &markup, state);
            response::respond_html(request, body)
        }
        Err(e) => response::respond_error(request, &e),
    }
}

/// Static files from the output tree (compiled styles, assets).
fn respond_static(request: Request, state: &PreviewState, path: &str) -> Result<()> {
    let rel = path.trim_start_matches('/');
    // Reject traversal out of the output root
    if rel.split('/').any(|part| part == "..") {
        return response::respond_not_found(request);
    }

    let file = state.layout.output_root.join(rel);
    if file.is_file() {
        response::respond_file(request, &file)
    } else {
        response::respond_not_found(request)
    }
}

/// Wrap preview content in a page linking the compiled bundle and the
/// reload script.
fn preview_page(title: &str, content: &str, state: &PreviewState) -> String {
    let stylesheet = format!(
        "/assets/styles/{}.css",
        state.config.package.module_name
    );
    let reload = state.ws_port.map(reload_script).unwrap_or_default();
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"{stylesheet}\">\n</head>\n<body>\n{content}\n{reload}</body>\n</html>\n"
    )
}

/// Client-side listener: reload styles in place, reload the page for
/// markup or comments changes.
fn reload_script(ws_port: u16) -> String {
    format!(
        r#"<script>
(function () {{
    var ws = new WebSocket("ws://" + location.hostname + ":{ws_port}/");
    ws.onmessage = function (event) {{
        var topic = JSON.parse(event.data).topic;
        if (topic === "styles") {{
            document.querySelectorAll("link[rel=stylesheet]").forEach(function (link) {{
                link.href = link.href.split("?")[0] + "?t=" + Date.now();
            }});
        }} else {{
            location.reload();
        }}
    }};
}})();
</script>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    fn state(ws_port: Option<u16>) -> PreviewState {
        let config = Arc::new(ToolConfig::default());
        let layout = OutputLayout::resolve(&config, OutputMode::Archive);
        PreviewState {
            config,
            layout,
            cache: Arc::new(MarkupCache::new()),
            ws_port,
        }
    }

    #[test]
    fn test_preview_page_links_bundle_and_reload() {
        let page = preview_page("badge / default", "<span/>", &state(Some(35729)));
        assert!(page.contains("/assets/styles/design-system.css"));
        assert!(page.contains(":35729/"));
    }

    #[test]
    fn test_preview_page_without_watch_has_no_reload() {
        let page = preview_page("index", "<p/>", &state(None));
        assert!(!page.contains("WebSocket"));
    }
}
