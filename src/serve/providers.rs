//! Pull-based data providers behind the preview endpoints.
//!
//! Both providers follow the same callback contract: the callback is
//! invoked exactly once per call, with the outcome. Failures are forwarded
//! unmodified; the caller decides how to render them.

use anyhow::Result;

use crate::comments::{self, CommentBlock};
use crate::config::ToolConfig;
use crate::markup::MarkupCache;

/// Fetch all style-guide comment blocks, freshly read from the sources.
pub fn fetch_comments<F>(config: &ToolConfig, callback: F)
where
    F: FnOnce(Result<Vec<CommentBlock>>),
{
    callback(comments::collect_comments(config));
}

/// Fetch rendered markup for one component variant, through the cache.
pub fn fetch_markup<F>(
    config: &ToolConfig,
    cache: &MarkupCache,
    component: &str,
    variant: &str,
    callback: F,
) where
    F: FnOnce(Result<String>),
{
    callback(cache.markup_for(config, component, variant));
}
