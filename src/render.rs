//! Block tree rendering.
//!
//! [`render`] maps one [`ContentBlock`] to a [`RenderNode`], a small
//! document-object model that [`RenderNode::to_html`] serializes. Dispatch is
//! an exhaustive match over [`BlockKind`]:
//!
//! | Kind | Output |
//! |------|--------|
//! | paragraph | `<p>` followed by nested children |
//! | heading 1–3 | `<h1>`–`<h3>` with `id` = block id |
//! | bulleted / numbered item | `<li>` (grouped into `<ul>` / `<ol>` by [`render_blocks`]) |
//! | to-do | checkbox item, struck through when checked |
//! | toggle | collapsed `<details>` |
//! | column list / column | side-by-side / stacked containers |
//! | code | `<pre><code>`, or a diagram slot for `mermaid` |
//! | image | `<figure><img>`, omitted without a URL |
//! | file / video / pdf | typed attachment link, omitted without a URL |
//! | quote | `<blockquote>` |
//! | divider | `<hr>` |
//! | callout | icon + text + children in a color variant |
//! | synced block | its children, nothing else |
//! | unknown | nothing |
//!
//! Rendering is pure and synchronous. Diagram slots stay pending until
//! [`crate::diagram::resolve_diagrams`] fills them in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::blocks::{plain_text, AttachmentKind, BlockKind, ContentBlock, Icon, MediaRef, RichText};
use crate::mapper::DEFAULT_SUMMARY;
use crate::models::{HeadingEntry, LoadedDocument};

/// Callout icon used when a block has none.
pub const DEFAULT_CALLOUT_ICON: &str = "ℹ️";

/// Code language that routes a code block to the diagram collaborator.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

// ═══════════════════════════════════════════════════════════════════════
// Render context
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}': use light or dark", other)),
        }
    }
}

/// UI state threaded through every render call.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub theme: Theme,
    /// Heading currently highlighted in navigation.
    pub active_heading: Option<String>,
}

impl RenderContext {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            active_heading: None,
        }
    }

    pub fn with_active_heading(mut self, id: Option<String>) -> Self {
        self.active_heading = id;
        self
    }

    fn is_active(&self, id: &str) -> bool {
        self.active_heading.as_deref() == Some(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Render tree
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
    /// Siblings without a wrapper element.
    Fragment(Vec<RenderNode>),
    Diagram(DiagramSlot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<RenderNode>,
}

/// A diagram awaiting (or holding) its rendered graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSlot {
    pub block_id: String,
    pub source: String,
    pub state: DiagramState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramState {
    Pending,
    /// SVG markup from the diagram service, embedded unescaped.
    Rendered(String),
    Failed(String),
}

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "input"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<RenderNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(RenderNode::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

impl RenderNode {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(&html_escape::encode_text(text)),
            RenderNode::Fragment(nodes) => {
                for node in nodes {
                    node.write_html(out);
                }
            }
            RenderNode::Element(element) => element.write_html(out),
            RenderNode::Diagram(slot) => slot.write_html(out),
        }
    }

    /// Mutable references to every diagram slot, in document order.
    pub fn diagram_slots_mut(&mut self) -> Vec<&mut DiagramSlot> {
        let mut slots = Vec::new();
        collect_slots(self, &mut slots);
        slots
    }
}

fn collect_slots<'a>(node: &'a mut RenderNode, out: &mut Vec<&'a mut DiagramSlot>) {
    match node {
        RenderNode::Diagram(slot) => out.push(slot),
        RenderNode::Element(element) => {
            for child in &mut element.children {
                collect_slots(child, out);
            }
        }
        RenderNode::Fragment(nodes) => {
            for child in nodes {
                collect_slots(child, out);
            }
        }
        RenderNode::Text(_) => {}
    }
}

impl Element {
    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl DiagramSlot {
    pub fn pending(block_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            source: source.into(),
            state: DiagramState::Pending,
        }
    }

    fn write_html(&self, out: &mut String) {
        let figure = Element::new("figure").attr("data-block-id", self.block_id.clone());
        match &self.state {
            // Not yet resolved.
            DiagramState::Pending => {
                figure
                    .class("kb-diagram kb-diagram-pending")
                    .child(Element::new("pre").class("mermaid").text(self.source.clone()))
                    .write_html(out);
            }
            DiagramState::Rendered(svg) => {
                out.push_str("<figure class=\"kb-diagram\" data-block-id=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&self.block_id));
                out.push_str("\">");
                out.push_str(svg);
                out.push_str("</figure>");
            }
            DiagramState::Failed(_) => {
                figure
                    .class("kb-diagram kb-diagram-failed")
                    .attr("role", "note")
                    .child(
                        Element::new("p")
                            .class("kb-diagram-error")
                            .text("Diagram unavailable"),
                    )
                    .child(
                        Element::new("pre")
                            .class("kb-diagram-source")
                            .text(self.source.clone()),
                    )
                    .write_html(out);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Block dispatch
// ═══════════════════════════════════════════════════════════════════════

/// Render one block. Returns `None` for blocks that produce no output:
/// unknown kinds and media without a resolvable URL.
pub fn render(block: &ContentBlock, ctx: &RenderContext) -> Option<RenderNode> {
    let node = match &block.kind {
        BlockKind::Paragraph(text) => {
            let paragraph = Element::new("p")
                .class(color_class("kb-paragraph", &text.color))
                .children(render_rich_text(&text.rich_text));
            with_nested_children(paragraph.into(), block, ctx)
        }
        BlockKind::Heading {
            level,
            text,
            toggleable,
        } => {
            let mut class = color_class("kb-heading", &text.color);
            if ctx.is_active(&block.id) {
                class.push_str(" kb-heading-active");
            }
            let heading = Element::new(heading_tag(*level))
                .attr("id", block.id.clone())
                .class(class)
                .children(render_rich_text(&text.rich_text));

            if *toggleable && !block.children.is_empty() {
                Element::new("details")
                    .class("kb-toggle kb-toggle-heading")
                    .child(Element::new("summary").child(heading))
                    .child(
                        Element::new("div")
                            .class("kb-toggle-body")
                            .child(render_blocks(&block.children, ctx)),
                    )
                    .into()
            } else {
                heading.into()
            }
        }
        BlockKind::BulletedListItem(text) | BlockKind::NumberedListItem(text) => {
            let mut item = Element::new("li")
                .class(color_class("kb-list-item", &text.color))
                .children(render_rich_text(&text.rich_text));
            if !block.children.is_empty() {
                item = item.child(render_blocks(&block.children, ctx));
            }
            item.into()
        }
        BlockKind::ToDo { text, checked } => {
            let mut checkbox = Element::new("input")
                .attr("type", "checkbox")
                .attr("disabled", "");
            let mut class = String::from("kb-todo");
            if *checked {
                checkbox = checkbox.attr("checked", "");
                class.push_str(" kb-todo-checked");
            }
            Element::new("div")
                .class(class)
                .child(checkbox)
                .child(
                    Element::new("span")
                        .class("kb-todo-text")
                        .children(render_rich_text(&text.rich_text)),
                )
                .into()
        }
        BlockKind::Toggle(text) => Element::new("details")
            .class(color_class("kb-toggle", &text.color))
            .child(Element::new("summary").children(render_rich_text(&text.rich_text)))
            .child(
                Element::new("div")
                    .class("kb-toggle-body")
                    .child(render_blocks(&block.children, ctx)),
            )
            .into(),
        BlockKind::ColumnList => {
            let columns: Vec<RenderNode> = block
                .children
                .iter()
                .filter(|child| {
                    let is_column = matches!(child.kind, BlockKind::Column);
                    if !is_column {
                        tracing::debug!(block_id = %child.id, kind = child.kind_tag(), "dropping non-column child of column list");
                    }
                    is_column
                })
                .filter_map(|child| render(child, ctx))
                .collect();
            Element::new("div")
                .class("kb-column-list")
                .attr("data-columns", columns.len().to_string())
                .children(columns)
                .into()
        }
        BlockKind::Column => Element::new("div")
            .class("kb-column")
            .child(render_blocks(&block.children, ctx))
            .into(),
        BlockKind::Code {
            rich_text,
            language,
            caption,
        } => {
            if language.eq_ignore_ascii_case(DIAGRAM_LANGUAGE) {
                RenderNode::Diagram(DiagramSlot::pending(block.id.clone(), plain_text(rich_text)))
            } else {
                render_code(rich_text, language, caption)
            }
        }
        BlockKind::Image(media) => render_image(media)?,
        BlockKind::Attachment { kind, media } => render_attachment(*kind, media)?,
        BlockKind::Quote(text) => {
            let mut quote = Element::new("blockquote")
                .class(color_class("kb-quote", &text.color))
                .children(render_rich_text(&text.rich_text));
            if !block.children.is_empty() {
                quote = quote.child(render_blocks(&block.children, ctx));
            }
            quote.into()
        }
        BlockKind::Divider => Element::new("hr").class("kb-divider").into(),
        BlockKind::Callout { text, icon } => {
            let variant = CalloutVariant::from_color(&text.color);
            let icon_node: RenderNode = match icon {
                Some(Icon::Url(url)) => Element::new("img")
                    .class("kb-callout-icon")
                    .attr("src", url.clone())
                    .attr("alt", "")
                    .into(),
                Some(Icon::Emoji(emoji)) => Element::new("span")
                    .class("kb-callout-icon")
                    .attr("aria-hidden", "true")
                    .text(emoji.clone())
                    .into(),
                None => Element::new("span")
                    .class("kb-callout-icon")
                    .attr("aria-hidden", "true")
                    .text(DEFAULT_CALLOUT_ICON)
                    .into(),
            };
            let mut body = Element::new("div").class("kb-callout-body").child(
                Element::new("div")
                    .class("kb-callout-text")
                    .children(render_rich_text(&text.rich_text)),
            );
            if !block.children.is_empty() {
                body = body.child(render_blocks(&block.children, ctx));
            }
            Element::new("aside")
                .class(format!("kb-callout kb-callout-{}", variant.as_str()))
                .attr("role", "note")
                .child(icon_node)
                .child(body)
                .into()
        }
        BlockKind::SyncedBlock { .. } => render_blocks(&block.children, ctx),
        BlockKind::Unknown { tag } => {
            tracing::trace!(block_id = %block.id, kind = %tag, "skipping unrecognized block");
            return None;
        }
    };
    Some(node)
}

/// Render a sibling sequence. Consecutive bulleted items are grouped into
/// one `<ul>`, consecutive numbered items into one `<ol>`.
pub fn render_blocks(blocks: &[ContentBlock], ctx: &RenderContext) -> RenderNode {
    let mut out = Vec::new();
    let mut open_list: Option<Element> = None;

    for block in blocks {
        let list_tag = match block.kind {
            BlockKind::BulletedListItem(_) => Some("ul"),
            BlockKind::NumberedListItem(_) => Some("ol"),
            _ => None,
        };

        if open_list.as_ref().map(|l| l.tag) != list_tag {
            if let Some(list) = open_list.take() {
                out.push(list.into());
            }
        }

        let Some(node) = render(block, ctx) else {
            continue;
        };

        match list_tag {
            Some(tag) => {
                let list = open_list
                    .take()
                    .unwrap_or_else(|| Element::new(tag).class(format!("kb-list kb-list-{}", tag)));
                open_list = Some(list.child(node));
            }
            None => out.push(node),
        }
    }

    if let Some(list) = open_list {
        out.push(list.into());
    }
    RenderNode::Fragment(out)
}

/// Render a whole document body inside a themed `<article>`.
pub fn render_document(blocks: &[ContentBlock], ctx: &RenderContext) -> RenderNode {
    Element::new("article")
        .class("kb-document")
        .attr("data-theme", ctx.theme.as_str())
        .child(render_blocks(blocks, ctx))
        .into()
}

/// Render the table of contents. Returns `None` for documents without
/// headings.
pub fn render_toc(entries: &[HeadingEntry], ctx: &RenderContext) -> Option<RenderNode> {
    if entries.is_empty() {
        return None;
    }

    let items = entries.iter().map(|entry| {
        let mut link = Element::new("a")
            .attr("href", format!("#{}", entry.id))
            .text(entry.text.clone());
        let mut class = format!("kb-toc-item kb-toc-level-{}", entry.level);
        if ctx.is_active(&entry.id) {
            link = link.attr("aria-current", "location");
            class.push_str(" kb-toc-active");
        }
        RenderNode::from(Element::new("li").class(class).child(link))
    });

    Some(
        Element::new("nav")
            .class("kb-toc")
            .attr("aria-label", "Contents")
            .child(Element::new("ul").children(items))
            .into(),
    )
}

/// Assemble a standalone HTML page: header metadata, table of contents and
/// the rendered body (diagrams already resolved by the caller).
pub fn render_page(doc: &LoadedDocument, body: &RenderNode, ctx: &RenderContext) -> String {
    let item = &doc.item;

    let mut meta = Element::new("div")
        .class("kb-meta")
        .child(Element::new("span").class("kb-category").text(item.category.clone()));
    if !item.created_date.is_empty() {
        meta = meta.child(
            Element::new("time")
                .class("kb-created")
                .text(item.created_date.clone()),
        );
    }

    let mut header = Element::new("header").class("kb-header");
    if let Some(cover) = doc.details.cover.as_deref().filter(|c| !c.trim().is_empty()) {
        header = header.child(
            Element::new("img")
                .class("kb-cover")
                .attr("src", cover)
                .attr("alt", ""),
        );
    }
    if let Some(Icon::Emoji(emoji)) = &doc.details.icon {
        header = header.child(Element::new("span").class("kb-page-icon").text(emoji.clone()));
    }
    header = header
        .child(meta)
        .child(Element::new("h1").class("kb-title").text(item.title.clone()));
    if item.summary != DEFAULT_SUMMARY {
        header = header.child(Element::new("p").class("kb-summary").text(item.summary.clone()));
    }

    let mut main = Element::new("main").class("kb-main");
    if let Some(toc) = render_toc(&doc.toc, ctx) {
        main = main.child(toc);
    }
    main = main.child(body.clone());

    let page = Element::new("html")
        .attr("lang", "en")
        .attr("data-theme", ctx.theme.as_str())
        .child(
            Element::new("head")
                .child(Element::new("meta").attr("charset", "utf-8"))
                .child(Element::new("title").text(item.title.clone())),
        )
        .child(Element::new("body").child(header).child(main));

    format!("<!DOCTYPE html>{}", RenderNode::from(page).to_html())
}

// ═══════════════════════════════════════════════════════════════════════
// Kind helpers
// ═══════════════════════════════════════════════════════════════════════

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}

fn with_nested_children(node: RenderNode, block: &ContentBlock, ctx: &RenderContext) -> RenderNode {
    if block.children.is_empty() {
        return node;
    }
    RenderNode::Fragment(vec![
        node,
        Element::new("div")
            .class("kb-children")
            .child(render_blocks(&block.children, ctx))
            .into(),
    ])
}

fn render_code(rich_text: &[RichText], language: &str, caption: &[RichText]) -> RenderNode {
    let label = if language.is_empty() {
        "plain text"
    } else {
        language
    };
    let mut figure = Element::new("figure")
        .class("kb-code")
        .child(Element::new("div").class("kb-code-language").text(label))
        .child(
            Element::new("pre").attr("data-language", label).child(
                Element::new("code")
                    .class(format!("language-{}", sanitize_token(label)))
                    .text(plain_text(rich_text)),
            ),
        );
    if !caption.is_empty() {
        figure = figure.child(Element::new("figcaption").children(render_rich_text(caption)));
    }
    figure.into()
}

fn render_image(media: &MediaRef) -> Option<RenderNode> {
    let url = media.resolved_url()?;
    let mut figure = Element::new("figure").class("kb-image").child(
        Element::new("img")
            .attr("src", url)
            .attr("alt", plain_text(&media.caption))
            .attr("loading", "lazy"),
    );
    if !media.caption.is_empty() {
        figure = figure.child(Element::new("figcaption").children(render_rich_text(&media.caption)));
    }
    Some(figure.into())
}

fn render_attachment(kind: AttachmentKind, media: &MediaRef) -> Option<RenderNode> {
    let url = media.resolved_url().filter(|u| is_safe_url(u))?;
    let caption = plain_text(&media.caption);
    let label = media
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| Some(caption).filter(|c| !c.trim().is_empty()))
        .unwrap_or_else(|| file_name_from_url(url));

    Some(
        Element::new("div")
            .class(format!("kb-attachment kb-attachment-{}", kind.as_str()))
            .attr("data-kind", kind.as_str())
            .child(
                Element::new("a")
                    .attr("href", url)
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text(label),
            )
            .into(),
    )
}

fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}

/// Presentation variants for callouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutVariant {
    Neutral,
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
}

impl CalloutVariant {
    /// Map a store color tag (`blue`, `red_background`, ...) to a variant.
    pub fn from_color(color: &str) -> Self {
        let base = color.strip_suffix("_background").unwrap_or(color);
        match base {
            "blue" => Self::Blue,
            "green" => Self::Green,
            "yellow" | "orange" => Self::Yellow,
            "red" | "pink" => Self::Red,
            "purple" => Self::Purple,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Purple => "purple",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rich text
// ═══════════════════════════════════════════════════════════════════════

/// Render spans in order. Annotations nest code innermost, then bold,
/// italic, strikethrough, underline and color; a link wraps the result.
pub fn render_rich_text(spans: &[RichText]) -> Vec<RenderNode> {
    spans
        .iter()
        .filter(|span| !span.plain_text.is_empty())
        .map(render_span)
        .collect()
}

fn render_span(span: &RichText) -> RenderNode {
    let a = &span.annotations;

    let mut node = if a.code {
        Element::new("code")
            .class("kb-inline-code")
            .text(span.plain_text.clone())
            .into()
    } else {
        text_with_breaks(&span.plain_text)
    };

    let wrap = |tag: &'static str, inner: RenderNode| -> RenderNode {
        Element::new(tag).child(inner).into()
    };
    if a.bold {
        node = wrap("strong", node);
    }
    if a.italic {
        node = wrap("em", node);
    }
    if a.strikethrough {
        node = wrap("s", node);
    }
    if a.underline {
        node = wrap("u", node);
    }
    if a.color != "default" && !a.color.is_empty() {
        node = Element::new("span")
            .class(format!("kb-color-{}", sanitize_token(&a.color)))
            .child(node)
            .into();
    }

    if let Some(href) = span.href.as_deref().filter(|h| is_safe_url(h)) {
        let mut link = Element::new("a").attr("href", href);
        if href.starts_with("http://") || href.starts_with("https://") {
            link = link
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer");
        }
        node = link.child(node).into();
    }

    node
}

fn text_with_breaks(text: &str) -> RenderNode {
    if !text.contains('\n') {
        return RenderNode::Text(text.to_string());
    }
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Element::new("br").into());
        }
        if !line.is_empty() {
            nodes.push(RenderNode::Text(line.to_string()));
        }
    }
    RenderNode::Fragment(nodes)
}

fn color_class(base: &str, color: &str) -> String {
    if color.is_empty() || color == "default" {
        base.to_string()
    } else {
        format!("{} kb-color-{}", base, sanitize_token(color))
    }
}

/// Keep only characters safe inside a class name.
/// Link targets are limited to http(s), mailto and relative references.
fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();
    if compact.is_empty() {
        return false;
    }

    match compact.find([':', '/', '?', '#']) {
        Some(i) if compact[i..].starts_with(':') => {
            let scheme = compact[..i].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn sanitize_token(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
