//! Style-guide comment extraction.
//!
//! Preview comments are written in the stylesheet sources as `/*doc ... */`
//! blocks. The preview server re-reads them on demand; the watch dispatcher
//! keys the `comments` notification off style-source changes because this is
//! where the comments live.

use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ToolConfig;
use crate::utils::path::{relative_to, walk_files};

/// Opening delimiter of a style-guide comment block.
const DOC_OPEN: &str = "/*doc";
/// Closing delimiter of a comment block.
const DOC_CLOSE: &str = "*/";

/// One extracted comment block.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentBlock {
    /// Source file, relative to the project root.
    pub file: String,
    /// First non-empty line of the block.
    pub heading: String,
    /// Full block body, delimiters stripped.
    pub body: String,
}

/// Extract all comment blocks from the scss tree, in path order.
pub fn collect_comments(config: &ToolConfig) -> Result<Vec<CommentBlock>> {
    let scss_dir = config.scss_dir();
    if !scss_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut blocks = Vec::new();
    for path in walk_files(&scss_dir) {
        if path.extension().and_then(|e| e.to_str()) != Some("scss") {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file = relative_to(&path, config.get_root())
            .to_string_lossy()
            .into_owned();
        extract_blocks(&content, &file, &mut blocks);
    }
    Ok(blocks)
}

/// Scan one file's content for `/*doc ... */` blocks.
fn extract_blocks(content: &str, file: &str, blocks: &mut Vec<CommentBlock>) {
    let mut rest = content;
    while let Some(open) = rest.find(DOC_OPEN) {
        let after_open = &rest[open + DOC_OPEN.len()..];
        let Some(close) = after_open.find(DOC_CLOSE) else {
            // Unterminated block: ignore the remainder of the file
            return;
        };

        let body = after_open[..close].trim();
        if !body.is_empty() {
            let heading = body
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or_default()
                .trim()
                .to_string();
            blocks.push(CommentBlock {
                file: file.to_string(),
                heading,
                body: body.to_string(),
            });
        }

        rest = &after_open[close + DOC_CLOSE.len()..];
    }
}
