//! HTTP response helpers for the preview server.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime;

fn make_header(field: &str, value: &str) -> Header {
    Header::from_bytes(field.as_bytes(), value.as_bytes()).expect("static header")
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

/// Respond with an HTML page.
pub fn respond_html(request: Request, body: String) -> Result<()> {
    send_body(request, 200, mime::types::HTML, body.into_bytes())
}

/// Respond with a JSON document.
pub fn respond_json(request: Request, body: String) -> Result<()> {
    send_body(request, 200, mime::types::JSON, body.into_bytes())
}

/// Respond with a static file from the output tree.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(
        request,
        404,
        mime::types::PLAIN,
        b"404 Not Found".to_vec(),
    )
}

/// Respond with a 500 carrying the error text, so the preview page shows
/// what broke instead of silently dropping the request.
pub fn respond_error(request: Request, error: &anyhow::Error) -> Result<()> {
    send_body(
        request,
        500,
        mime::types::PLAIN,
        format!("500 Internal Server Error\n\n{error:#}").into_bytes(),
    )
}
