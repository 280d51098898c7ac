//! Document retrieval by page ID.
//!
//! Loads a page's block tree and details, renders it, and returns the shape
//! used by both `kb get` and `GET /api/documents/{id}`.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::blocks::Icon;
use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::models::{HeadingEntry, LoadedDocument, ResultItem};
use crate::render::{RenderContext, Theme};

/// Rendered document as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub item: ResultItem,
    pub cover: Option<String>,
    pub icon: Option<Icon>,
    pub toc: Vec<HeadingEntry>,
    pub html: String,
}

/// Render a loaded document into a [`DocumentView`].
pub async fn build_view(kb: &KnowledgeBase, doc: LoadedDocument, ctx: &RenderContext) -> DocumentView {
    let rendered = kb.render_document(&doc, ctx).await;
    DocumentView {
        item: doc.item,
        cover: doc.details.cover,
        icon: doc.details.icon,
        toc: rendered.toc,
        html: rendered.html,
    }
}

/// Core get function returning structured data (used by CLI and server).
pub async fn get_document(
    kb: &KnowledgeBase,
    page_id: &str,
    ctx: &RenderContext,
) -> Result<DocumentView> {
    if page_id.trim().is_empty() {
        bail!("page id must not be empty");
    }
    let Some(doc) = kb.load_document(page_id).await else {
        bail!("document not found: {}", page_id);
    };
    Ok(build_view(kb, doc, ctx).await)
}

/// CLI entry point: load, render and print one document.
pub async fn run_get(config: &Config, page_id: &str, format: &str, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse().map_err(anyhow::Error::msg)?;
    match format {
        "html" | "toc" | "json" => {}
        _ => bail!("Unknown format: {}. Use html, toc, or json.", format),
    }

    let kb = KnowledgeBase::from_config(config).context("Failed to create Notion client")?;
    let ctx = RenderContext::new(theme);
    let view = get_document(&kb, page_id, &ctx).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&view)?),
        "toc" => print_toc(&view),
        _ => println!("{}", view.html),
    }
    Ok(())
}

fn print_toc(view: &DocumentView) {
    println!("--- {} ---", view.item.title);
    if view.toc.is_empty() {
        println!("(no headings)");
        return;
    }
    for entry in &view.toc {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!("{}- {}  #{}", indent, entry.text, entry.id);
    }
}
