//! Typed document blocks.
//!
//! The store returns each block as a JSON object whose `type` field names a
//! kind and whose same-named field holds the kind's payload:
//!
//! ```json
//! { "id": "b1", "type": "paragraph", "has_children": false,
//!   "paragraph": { "rich_text": [ ... ], "color": "default" } }
//! ```
//!
//! [`ContentBlock::from_value`] decodes that shape into a closed
//! [`BlockKind`] union. Kinds the crate does not render, and known kinds
//! whose payload cannot be decoded, become [`BlockKind::Unknown`] so the
//! renderer can drop them explicitly. Decoding never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_color() -> String {
    "default".to_string()
}

/// A run of text with independent style annotations and an optional link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    /// Unstyled span, mostly useful for building trees by hand.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

/// Concatenated plain text of a span sequence, in span order.
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|t| t.plain_text.as_str()).collect()
}

/// Spans plus the block-level color tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default = "default_color")]
    pub color: String,
}

impl TextBlock {
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text,
            color: default_color(),
        }
    }
}

/// Reference to an externally linked or store-hosted file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaRef {
    pub url: Option<String>,
    pub caption: Vec<RichText>,
    pub name: Option<String>,
}

impl MediaRef {
    /// The media URL, or `None` when it is missing or blank.
    pub fn resolved_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    File,
    Video,
    Pdf,
}

impl AttachmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Video => "video",
            Self::Pdf => "pdf",
        }
    }
}

/// Page or callout icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Emoji(String),
    Url(String),
}

impl Icon {
    /// Decode the store's `{ "type": "emoji", "emoji": "💡" }` shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let tag = value.get("type")?.as_str()?;
        match tag {
            "emoji" => value
                .get("emoji")
                .and_then(Value::as_str)
                .map(|e| Icon::Emoji(e.to_string())),
            other => value
                .get(other)
                .and_then(|v| v.get("url"))
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(|url| Icon::Url(url.to_string())),
        }
    }
}

/// Recognized block kinds with their payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph(TextBlock),
    Heading {
        level: u8,
        text: TextBlock,
        toggleable: bool,
    },
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo {
        text: TextBlock,
        checked: bool,
    },
    Toggle(TextBlock),
    ColumnList,
    Column,
    Code {
        rich_text: Vec<RichText>,
        language: String,
        caption: Vec<RichText>,
    },
    Image(MediaRef),
    Attachment {
        kind: AttachmentKind,
        media: MediaRef,
    },
    Quote(TextBlock),
    Divider,
    Callout {
        text: TextBlock,
        icon: Option<Icon>,
    },
    SyncedBlock {
        /// Id of the original block when this one is a mirror.
        synced_from: Option<String>,
    },
    Unknown {
        tag: String,
    },
}

impl BlockKind {
    /// The block's own text spans, empty for kinds without text.
    pub fn rich_text(&self) -> &[RichText] {
        match self {
            BlockKind::Paragraph(t)
            | BlockKind::BulletedListItem(t)
            | BlockKind::NumberedListItem(t)
            | BlockKind::Toggle(t)
            | BlockKind::Quote(t)
            | BlockKind::Heading { text: t, .. }
            | BlockKind::ToDo { text: t, .. }
            | BlockKind::Callout { text: t, .. } => &t.rich_text,
            BlockKind::Code { rich_text, .. } => rich_text,
            BlockKind::Image(media) | BlockKind::Attachment { media, .. } => &media.caption,
            BlockKind::ColumnList
            | BlockKind::Column
            | BlockKind::Divider
            | BlockKind::SyncedBlock { .. }
            | BlockKind::Unknown { .. } => &[],
        }
    }
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    pub id: String,
    pub has_children: bool,
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentBlock>,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
            children: Vec::new(),
        }
    }

    /// Attach children, setting `has_children` accordingly.
    pub fn with_children(mut self, children: Vec<ContentBlock>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// Decode one block object. A nested `children` array, when present, is
    /// decoded recursively.
    pub fn from_value(value: &Value) -> Self {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let has_children = value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let payload = value
            .get(tag)
            .filter(|p| p.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        let kind = match decode_kind(tag, payload) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!(block_id = %id, kind = tag, error = %e, "undecodable block payload");
                BlockKind::Unknown {
                    tag: tag.to_string(),
                }
            }
        };

        let children = value
            .get("children")
            .map(Self::list_from_value)
            .unwrap_or_default();

        Self {
            id,
            has_children: has_children || !children.is_empty(),
            kind,
            children,
        }
    }

    /// Decode a block list: either a bare array or a list response object
    /// with a `results` array.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        let items = value
            .as_array()
            .or_else(|| value.get("results").and_then(Value::as_array));
        items
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// The store's kind tag for this block.
    pub fn kind_tag(&self) -> &str {
        match &self.kind {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading { level: 1, .. } => "heading_1",
            BlockKind::Heading { level: 2, .. } => "heading_2",
            BlockKind::Heading { .. } => "heading_3",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Code { .. } => "code",
            BlockKind::Image(_) => "image",
            BlockKind::Attachment { kind, .. } => kind.as_str(),
            BlockKind::Quote(_) => "quote",
            BlockKind::Divider => "divider",
            BlockKind::Callout { .. } => "callout",
            BlockKind::SyncedBlock { .. } => "synced_block",
            BlockKind::Unknown { tag } => tag.as_str(),
        }
    }

    /// Kinds whose children the tree fetcher loads. Headings only count
    /// when they are toggleable.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Toggle(_)
                | BlockKind::Heading {
                    toggleable: true,
                    ..
                }
                | BlockKind::Callout { .. }
                | BlockKind::Column
                | BlockKind::ColumnList
                | BlockKind::SyncedBlock { .. }
                | BlockKind::Quote(_)
        )
    }

    /// Block id to fetch children from. Mirrored synced blocks read their
    /// children from the original.
    pub fn children_source(&self) -> &str {
        match &self.kind {
            BlockKind::SyncedBlock {
                synced_from: Some(original),
            } => original,
            _ => &self.id,
        }
    }
}

// ============ Payload decoding ============

#[derive(Deserialize)]
struct HeadingPayload {
    #[serde(flatten)]
    text: TextBlock,
    #[serde(default)]
    is_toggleable: bool,
}

#[derive(Deserialize)]
struct ToDoPayload {
    #[serde(flatten)]
    text: TextBlock,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
    #[serde(default)]
    language: String,
    #[serde(default)]
    caption: Vec<RichText>,
}

#[derive(Deserialize)]
struct UrlRef {
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct MediaPayload {
    #[serde(default, rename = "type")]
    source: String,
    #[serde(default)]
    external: Option<UrlRef>,
    #[serde(default)]
    file: Option<UrlRef>,
    #[serde(default)]
    caption: Vec<RichText>,
    #[serde(default)]
    name: Option<String>,
}

impl From<MediaPayload> for MediaRef {
    fn from(p: MediaPayload) -> Self {
        let (primary, secondary) = if p.source == "file" {
            (p.file, p.external)
        } else {
            (p.external, p.file)
        };
        Self {
            url: primary.or(secondary).map(|r| r.url),
            caption: p.caption,
            name: p.name,
        }
    }
}

#[derive(Deserialize)]
struct CalloutPayload {
    #[serde(flatten)]
    text: TextBlock,
    #[serde(default)]
    icon: Option<Value>,
}

#[derive(Deserialize)]
struct SyncedPayload {
    #[serde(default)]
    synced_from: Option<SyncedFrom>,
}

#[derive(Deserialize)]
struct SyncedFrom {
    #[serde(default)]
    block_id: Option<String>,
}

fn decode_kind(tag: &str, payload: Value) -> Result<BlockKind, serde_json::Error> {
    use serde_json::from_value;

    let kind = match tag {
        "paragraph" => BlockKind::Paragraph(from_value(payload)?),
        "heading_1" | "heading_2" | "heading_3" => {
            let p: HeadingPayload = from_value(payload)?;
            let level = match tag {
                "heading_1" => 1,
                "heading_2" => 2,
                _ => 3,
            };
            BlockKind::Heading {
                level,
                text: p.text,
                toggleable: p.is_toggleable,
            }
        }
        "bulleted_list_item" => BlockKind::BulletedListItem(from_value(payload)?),
        "numbered_list_item" => BlockKind::NumberedListItem(from_value(payload)?),
        "to_do" => {
            let p: ToDoPayload = from_value(payload)?;
            BlockKind::ToDo {
                text: p.text,
                checked: p.checked,
            }
        }
        "toggle" => BlockKind::Toggle(from_value(payload)?),
        "column_list" => BlockKind::ColumnList,
        "column" => BlockKind::Column,
        "code" => {
            let p: CodePayload = from_value(payload)?;
            BlockKind::Code {
                rich_text: p.rich_text,
                language: p.language,
                caption: p.caption,
            }
        }
        "image" => BlockKind::Image(from_value::<MediaPayload>(payload)?.into()),
        "file" | "video" | "pdf" => {
            let kind = match tag {
                "video" => AttachmentKind::Video,
                "pdf" => AttachmentKind::Pdf,
                _ => AttachmentKind::File,
            };
            BlockKind::Attachment {
                kind,
                media: from_value::<MediaPayload>(payload)?.into(),
            }
        }
        "quote" => BlockKind::Quote(from_value(payload)?),
        "divider" => BlockKind::Divider,
        "callout" => {
            let p: CalloutPayload = from_value(payload)?;
            BlockKind::Callout {
                text: p.text,
                icon: p.icon.as_ref().and_then(Icon::from_value),
            }
        }
        "synced_block" => {
            let p: SyncedPayload = from_value(payload)?;
            BlockKind::SyncedBlock {
                synced_from: p.synced_from.and_then(|s| s.block_id),
            }
        }
        other => BlockKind::Unknown {
            tag: other.to_string(),
        },
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paragraph_with_annotations() {
        let block = ContentBlock::from_value(&json!({
            "id": "p1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {
                "rich_text": [
                    { "plain_text": "bold", "href": null,
                      "annotations": { "bold": true, "italic": false, "strikethrough": false,
                                       "underline": false, "code": false, "color": "red" } },
                    { "plain_text": " link", "href": "https://example.com" }
                ],
                "color": "default"
            }
        }));

        assert_eq!(block.id, "p1");
        assert_eq!(block.kind_tag(), "paragraph");
        let spans = block.kind.rich_text();
        assert_eq!(spans.len(), 2);
        assert!(spans[0].annotations.bold);
        assert_eq!(spans[0].annotations.color, "red");
        assert_eq!(spans[1].href.as_deref(), Some("https://example.com"));
        assert_eq!(spans[1].annotations.color, "default");
        assert_eq!(plain_text(spans), "bold link");
    }

    #[test]
    fn test_heading_levels() {
        for (tag, level) in [("heading_1", 1), ("heading_2", 2), ("heading_3", 3)] {
            let block = ContentBlock::from_value(&json!({
                "id": "h", "type": tag,
                tag: { "rich_text": [{ "plain_text": "Title" }], "is_toggleable": false }
            }));
            match block.kind {
                BlockKind::Heading { level: l, .. } => assert_eq!(l, level),
                other => panic!("expected heading, got {:?}", other),
            }
            assert_eq!(block.kind_tag(), tag);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let block = ContentBlock::from_value(&json!({
            "id": "u", "type": "unsupported_kind", "unsupported_kind": {}
        }));
        assert_eq!(
            block.kind,
            BlockKind::Unknown {
                tag: "unsupported_kind".to_string()
            }
        );
        assert_eq!(block.kind_tag(), "unsupported_kind");
    }

    #[test]
    fn test_malformed_payload_becomes_unknown() {
        let block = ContentBlock::from_value(&json!({
            "id": "bad", "type": "paragraph",
            "paragraph": { "rich_text": "not a list" }
        }));
        assert!(matches!(block.kind, BlockKind::Unknown { .. }));
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        let block = ContentBlock::from_value(&json!({ "id": "d", "type": "divider" }));
        assert_eq!(block.kind, BlockKind::Divider);

        let block = ContentBlock::from_value(&json!({ "id": "p", "type": "paragraph" }));
        assert_eq!(block.kind, BlockKind::Paragraph(TextBlock::new(vec![])));
    }

    #[test]
    fn test_media_resolution() {
        let external = ContentBlock::from_value(&json!({
            "id": "i1", "type": "image",
            "image": { "type": "external", "external": { "url": "https://img.example/a.png" } }
        }));
        let hosted = ContentBlock::from_value(&json!({
            "id": "i2", "type": "image",
            "image": { "type": "file", "file": { "url": "https://s3.example/b.png", "expiry_time": "2024-01-01T00:00:00.000Z" } }
        }));
        let empty = ContentBlock::from_value(&json!({
            "id": "i3", "type": "image",
            "image": { "type": "external", "external": { "url": "  " } }
        }));

        let url = |b: &ContentBlock| match &b.kind {
            BlockKind::Image(m) => m.resolved_url().map(str::to_string),
            _ => None,
        };
        assert_eq!(url(&external).as_deref(), Some("https://img.example/a.png"));
        assert_eq!(url(&hosted).as_deref(), Some("https://s3.example/b.png"));
        assert_eq!(url(&empty), None);
    }

    #[test]
    fn test_attachment_kinds() {
        for (tag, kind) in [
            ("file", AttachmentKind::File),
            ("video", AttachmentKind::Video),
            ("pdf", AttachmentKind::Pdf),
        ] {
            let block = ContentBlock::from_value(&json!({
                "id": "a", "type": tag,
                tag: { "type": "file", "file": { "url": "https://files.example/x" }, "name": "x" }
            }));
            match &block.kind {
                BlockKind::Attachment { kind: k, media } => {
                    assert_eq!(*k, kind);
                    assert_eq!(media.name.as_deref(), Some("x"));
                }
                other => panic!("expected attachment, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_callout_icon_and_synced_from() {
        let callout = ContentBlock::from_value(&json!({
            "id": "c", "type": "callout",
            "callout": { "rich_text": [], "icon": { "type": "emoji", "emoji": "💡" }, "color": "blue_background" }
        }));
        match callout.kind {
            BlockKind::Callout { icon, text } => {
                assert_eq!(icon, Some(Icon::Emoji("💡".to_string())));
                assert_eq!(text.color, "blue_background");
            }
            other => panic!("expected callout, got {:?}", other),
        }

        let mirror = ContentBlock::from_value(&json!({
            "id": "s2", "type": "synced_block", "has_children": true,
            "synced_block": { "synced_from": { "type": "block_id", "block_id": "s1" } }
        }));
        assert!(mirror.is_container());
        assert_eq!(mirror.children_source(), "s1");

        let original = ContentBlock::from_value(&json!({
            "id": "s1", "type": "synced_block",
            "synced_block": { "synced_from": null }
        }));
        assert_eq!(original.children_source(), "s1");
    }

    #[test]
    fn test_nested_children_and_list_shapes() {
        let tree = json!({
            "results": [
                { "id": "t", "type": "toggle", "has_children": true,
                  "toggle": { "rich_text": [{ "plain_text": "More" }] },
                  "children": [
                      { "id": "c1", "type": "paragraph", "paragraph": { "rich_text": [] } }
                  ] }
            ]
        });
        let blocks = ContentBlock::list_from_value(&tree);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].has_children);
        assert_eq!(blocks[0].children[0].id, "c1");

        let bare = ContentBlock::list_from_value(&tree["results"]);
        assert_eq!(bare, blocks);

        assert!(ContentBlock::list_from_value(&json!("nope")).is_empty());
    }

    #[test]
    fn test_container_kinds() {
        let container = |tag: &str| {
            ContentBlock::from_value(&json!({ "id": "x", "type": tag, tag: {} })).is_container()
        };
        for tag in ["toggle", "callout", "column", "column_list", "synced_block", "quote"] {
            assert!(container(tag), "{} should be a container", tag);
        }
        for tag in ["paragraph", "heading_1", "bulleted_list_item", "to_do", "image", "code"] {
            assert!(!container(tag), "{} should not be a container", tag);
        }

        let toggle_heading = ContentBlock::from_value(&json!({
            "id": "h", "type": "heading_2",
            "heading_2": { "rich_text": [], "is_toggleable": true }
        }));
        assert!(toggle_heading.is_container());
    }
}
