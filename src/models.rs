//! Core data models shared by the mapper, renderer, store client and server.
//!
//! Block-level types live in [`crate::blocks`]; this module holds the
//! page-level records that flow between search, loading and rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::blocks::{ContentBlock, Icon};

/// A page as returned by a database query, before normalization.
///
/// `properties` is the store's loosely typed property bag; the
/// [`mapper`](crate::mapper) reads it defensively.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub created_date: String,
    pub summary: String,
}

/// One navigation entry of a document's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Document-level metadata not carried by individual blocks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageDetails {
    pub cover: Option<String>,
    pub icon: Option<Icon>,
    pub properties: Map<String, Value>,
}

/// A fully fetched document, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedDocument {
    pub item: ResultItem,
    pub details: PageDetails,
    pub blocks: Vec<ContentBlock>,
    pub toc: Vec<HeadingEntry>,
}

/// Rendered output of a loaded document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub toc: Vec<HeadingEntry>,
}
