//! Knowledge base service.
//!
//! Wires a [`DocumentStore`], the result mapper, recursive tree fetching,
//! the block renderer and a [`DiagramRenderer`] into the operations the CLI
//! and server expose. Store failures never escape as errors from the
//! user-facing operations: a failed search is an empty list, a failed count
//! is zero and a failed document load is `None`, each logged once.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::blocks::ContentBlock;
use crate::config::Config;
use crate::diagram::{self, resolve_diagrams, DiagramRenderer};
use crate::error::StoreError;
use crate::mapper::{normalize, normalize_properties};
use crate::models::{LoadedDocument, RenderedDocument, ResultItem};
use crate::notion::NotionClient;
use crate::render::{self, RenderContext, RenderNode};
use crate::toc::extract_headings;
use crate::traits::DocumentStore;

const DEFAULT_MAX_DEPTH: usize = 8;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Children already fetched during one load, keyed by source block id,
/// with the depth of the block they were fetched for.
type FetchMemo = HashMap<String, (usize, Vec<ContentBlock>)>;

pub struct KnowledgeBase {
    store: Arc<dyn DocumentStore>,
    diagrams: Arc<dyn DiagramRenderer>,
    max_depth: usize,
}

impl KnowledgeBase {
    pub fn new(store: Arc<dyn DocumentStore>, diagrams: Arc<dyn DiagramRenderer>) -> Self {
        Self {
            store,
            diagrams,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Notion-backed service described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store = NotionClient::new(&config.notion)?;
        Ok(Self::new(Arc::new(store), diagram::from_config(&config.diagrams))
            .with_max_depth(config.notion.max_depth))
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Search by title substring. A blank query returns nothing without
    /// contacting the store.
    pub async fn query(&self, query: &str) -> Vec<ResultItem> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.store.search(query).await {
            Ok(records) => records.iter().map(normalize).collect(),
            Err(e) => {
                tracing::warn!(store = self.store.name(), query, category = e.category(), error = %e, "search failed");
                Vec::new()
            }
        }
    }

    pub async fn article_count(&self) -> usize {
        match self.store.count_all().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(store = self.store.name(), category = e.category(), error = %e, "article count failed");
                0
            }
        }
    }

    /// Fetch the block tree under `block_id`.
    ///
    /// Children are fetched only for container kinds, at most once per
    /// source block, down to the configured depth. A failed nested fetch
    /// leaves that block without children; a failed top-level fetch is an
    /// error.
    pub async fn fetch_tree(&self, block_id: &str) -> Result<Vec<ContentBlock>, StoreError> {
        let mut blocks = self.store.fetch_blocks(block_id).await?;
        let mut memo = FetchMemo::new();
        self.fill_children(&mut blocks, 1, &mut memo).await;
        Ok(blocks)
    }

    fn fill_children<'a>(
        &'a self,
        blocks: &'a mut [ContentBlock],
        depth: usize,
        memo: &'a mut FetchMemo,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            for block in blocks.iter_mut() {
                if !needs_children(block) {
                    continue;
                }
                if depth >= self.max_depth {
                    tracing::debug!(block_id = %block.id, depth, "depth limit reached, children skipped");
                    continue;
                }

                let source = block.children_source().to_string();
                // A subtree filled for a deeper block is too shallow to reuse here.
                if let Some((filled_at, cached)) = memo.get(&source) {
                    if *filled_at <= depth {
                        let mut children = cached.clone();
                        self.trim_to_depth(&mut children, depth + 1);
                        block.children = children;
                        continue;
                    }
                }

                let children = match self.store.fetch_blocks(&source).await {
                    Ok(mut children) => {
                        self.fill_children(&mut children, depth + 1, memo).await;
                        children
                    }
                    Err(e) => {
                        tracing::warn!(block_id = %block.id, source = %source, category = e.category(), error = %e, "nested block fetch failed");
                        Vec::new()
                    }
                };
                memo.insert(source, (depth, children.clone()));
                block.children = children;
            }
        })
    }

    /// Drop any children that sit deeper than `max_depth` allows when
    /// `blocks` is placed at `depth`.
    fn trim_to_depth(&self, blocks: &mut [ContentBlock], depth: usize) {
        for block in blocks.iter_mut() {
            if depth >= self.max_depth {
                block.children.clear();
            } else {
                self.trim_to_depth(&mut block.children, depth + 1);
            }
        }
    }

    /// Fetch a page's blocks and details concurrently. Both must succeed.
    pub async fn load_document(&self, page_id: &str) -> Option<LoadedDocument> {
        let (blocks, details) =
            tokio::join!(self.fetch_tree(page_id), self.store.fetch_details(page_id));

        let blocks = match blocks {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!(page_id, category = e.category(), error = %e, "failed to load document blocks");
                return None;
            }
        };
        let details = match details {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(page_id, category = e.category(), error = %e, "failed to load document details");
                return None;
            }
        };

        let item = normalize_properties(page_id, &details.properties);
        let toc = extract_headings(&blocks);
        tracing::debug!(page_id, blocks = blocks.len(), headings = toc.len(), "document loaded");

        Some(LoadedDocument {
            item,
            details,
            blocks,
            toc,
        })
    }

    /// Render a loaded document's body with diagrams resolved.
    pub async fn render_document(&self, doc: &LoadedDocument, ctx: &RenderContext) -> RenderedDocument {
        let body = self.render_body(doc, ctx).await;
        RenderedDocument {
            html: body.to_html(),
            toc: doc.toc.clone(),
        }
    }

    /// Render a loaded document as a standalone HTML page.
    pub async fn render_page(&self, doc: &LoadedDocument, ctx: &RenderContext) -> String {
        let body = self.render_body(doc, ctx).await;
        render::render_page(doc, &body, ctx)
    }

    async fn render_body(&self, doc: &LoadedDocument, ctx: &RenderContext) -> RenderNode {
        let mut body = render::render_document(&doc.blocks, ctx);
        let failed = resolve_diagrams(&mut body, self.diagrams.as_ref()).await;
        if failed > 0 {
            tracing::debug!(page_id = %doc.item.id, failed, "diagrams rendered as placeholders");
        }
        body
    }
}

fn needs_children(block: &ContentBlock) -> bool {
    block.is_container()
        && block.children.is_empty()
        && (block.has_children || block.children_source() != block.id)
}
