//! `kb render`: render a block tree stored as JSON, without a store.
//!
//! The file holds either a bare array of block objects or a list response
//! (`{ "results": [...] }`). Nested `children` arrays are rendered as-is.

use anyhow::{Context, Result};
use std::path::Path;

use crate::blocks::ContentBlock;
use crate::config::Config;
use crate::diagram::{self, resolve_diagrams};
use crate::render::{render_document, render_toc, RenderContext, Theme};
use crate::toc::extract_headings;

/// Render `path` and return the HTML. The table of contents, when requested
/// and non-empty, precedes the article.
pub async fn render_file(config: &Config, path: &Path, ctx: &RenderContext, with_toc: bool) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read block file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse block file: {}", path.display()))?;

    let blocks = ContentBlock::list_from_value(&value);
    tracing::debug!(path = %path.display(), blocks = blocks.len(), "rendering block file");

    let mut body = render_document(&blocks, ctx);
    let renderer = diagram::from_config(&config.diagrams);
    resolve_diagrams(&mut body, renderer.as_ref()).await;

    let mut html = String::new();
    if with_toc {
        if let Some(toc) = render_toc(&extract_headings(&blocks), ctx) {
            html.push_str(&toc.to_html());
        }
    }
    html.push_str(&body.to_html());
    Ok(html)
}

pub async fn run_render(config: &Config, path: &Path, theme: &str, with_toc: bool) -> Result<()> {
    let theme: Theme = theme.parse().map_err(anyhow::Error::msg)?;
    let html = render_file(config, path, &RenderContext::new(theme), with_toc).await?;
    println!("{}", html);
    Ok(())
}
