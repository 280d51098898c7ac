//! Table of contents extraction and active-section tracking.

use std::collections::HashMap;

use crate::blocks::{plain_text, BlockKind, ContentBlock};
use crate::models::HeadingEntry;

/// Collect every heading in pre-order document order, descending into any
/// block that has children. Headings without text are skipped.
pub fn extract_headings(blocks: &[ContentBlock]) -> Vec<HeadingEntry> {
    let mut out = Vec::new();
    walk(blocks, &mut out);
    out
}

fn walk(blocks: &[ContentBlock], out: &mut Vec<HeadingEntry>) {
    for block in blocks {
        if let BlockKind::Heading { level, text, .. } = &block.kind {
            let text = plain_text(&text.rich_text);
            if !text.trim().is_empty() {
                out.push(HeadingEntry {
                    id: block.id.clone(),
                    text,
                    level: *level,
                });
            }
        }
        if !block.children.is_empty() {
            walk(&block.children, out);
        }
    }
}

/// Visibility of a heading anchor relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// On screen; `top` is the anchor's offset from the viewport top.
    Visible { top: f64 },
    Hidden,
}

/// Vertical band of the viewport that counts as "being read".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusBand {
    pub start: f64,
    pub end: f64,
}

impl Default for FocusBand {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 120.0,
        }
    }
}

impl FocusBand {
    /// Distance from `top` to the band; zero inside it.
    pub fn distance(&self, top: f64) -> f64 {
        if top < self.start {
            self.start - top
        } else if top > self.end {
            top - self.end
        } else {
            0.0
        }
    }
}

/// Tracks which heading is active for navigation highlighting.
///
/// The answer depends only on the latest observation per heading, so
/// observations may arrive in any order and be repeated.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    band: FocusBand,
    order: Vec<String>,
    seen: HashMap<String, Visibility>,
}

impl ActiveSectionTracker {
    pub fn new(toc: &[HeadingEntry]) -> Self {
        Self::with_band(toc, FocusBand::default())
    }

    pub fn with_band(toc: &[HeadingEntry], band: FocusBand) -> Self {
        Self {
            band,
            order: toc.iter().map(|h| h.id.clone()).collect(),
            seen: HashMap::new(),
        }
    }

    pub fn observe(&mut self, heading_id: &str, visibility: Visibility) {
        if !self.order.iter().any(|id| id == heading_id) {
            tracing::debug!(heading_id, "ignoring observation for unknown heading");
            return;
        }
        self.seen.insert(heading_id.to_string(), visibility);
    }

    /// The visible heading nearest the focus band; ties go to the earlier
    /// heading.
    pub fn active(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for id in &self.order {
            let Some(Visibility::Visible { top }) = self.seen.get(id) else {
                continue;
            };
            let distance = self.band.distance(*top);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((id.as_str(), distance));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn heading(id: &str, level: u8, text: &str) -> ContentBlock {
        let tag = format!("heading_{}", level);
        ContentBlock::from_value(&json!({
            "id": id, "type": tag.clone(),
            tag: { "rich_text": [{ "plain_text": text }] }
        }))
    }

    fn entries(ids: &[&str]) -> Vec<HeadingEntry> {
        ids.iter()
            .map(|id| HeadingEntry {
                id: id.to_string(),
                text: id.to_string(),
                level: 2,
            })
            .collect()
    }

    #[test]
    fn test_nested_headings_in_preorder() {
        let toggle = ContentBlock::from_value(&json!({
            "id": "t", "type": "toggle", "toggle": { "rich_text": [] }
        }))
        .with_children(vec![heading("h2", 2, "Sub")]);
        let blocks = vec![heading("h1", 1, "Intro"), toggle];

        let toc = extract_headings(&blocks);
        assert_eq!(
            toc,
            vec![
                HeadingEntry { id: "h1".into(), text: "Intro".into(), level: 1 },
                HeadingEntry { id: "h2".into(), text: "Sub".into(), level: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_headings_excluded() {
        let blocks = vec![heading("a", 1, ""), heading("b", 3, "Kept")];
        let toc = extract_headings(&blocks);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].id, "b");
        assert_eq!(toc[0].level, 3);
    }

    #[test]
    fn test_heading_text_concatenates_spans() {
        let block = ContentBlock::from_value(&json!({
            "id": "h", "type": "heading_1",
            "heading_1": { "rich_text": [{ "plain_text": "Dark " }, { "plain_text": "matter" }] }
        }));
        assert_eq!(extract_headings(&[block])[0].text, "Dark matter");
    }

    #[test]
    fn test_focus_band_distance() {
        let band = FocusBand { start: 10.0, end: 50.0 };
        assert_eq!(band.distance(30.0), 0.0);
        assert_eq!(band.distance(0.0), 10.0);
        assert_eq!(band.distance(80.0), 30.0);
    }

    #[test]
    fn test_nearest_visible_heading_wins() {
        let mut tracker = ActiveSectionTracker::new(&entries(&["a", "b", "c"]));
        assert_eq!(tracker.active(), None);

        tracker.observe("a", Visibility::Visible { top: -300.0 });
        tracker.observe("b", Visibility::Visible { top: 400.0 });
        assert_eq!(tracker.active(), Some("b"));

        tracker.observe("c", Visibility::Visible { top: 60.0 });
        assert_eq!(tracker.active(), Some("c"));

        tracker.observe("c", Visibility::Hidden);
        assert_eq!(tracker.active(), Some("b"));
    }

    #[test]
    fn test_observation_order_does_not_matter() {
        let toc = entries(&["a", "b"]);
        let mut forward = ActiveSectionTracker::new(&toc);
        forward.observe("a", Visibility::Visible { top: 20.0 });
        forward.observe("b", Visibility::Visible { top: 90.0 });

        let mut backward = ActiveSectionTracker::new(&toc);
        backward.observe("b", Visibility::Visible { top: 90.0 });
        backward.observe("a", Visibility::Visible { top: 20.0 });
        backward.observe("a", Visibility::Visible { top: 20.0 });

        // Both inside the band: document order breaks the tie.
        assert_eq!(forward.active(), Some("a"));
        assert_eq!(backward.active(), Some("a"));
    }

    #[test]
    fn test_unknown_ids_ignored_and_reset() {
        let mut tracker = ActiveSectionTracker::new(&entries(&["a"]));
        tracker.observe("zzz", Visibility::Visible { top: 0.0 });
        assert_eq!(tracker.active(), None);

        tracker.observe("a", Visibility::Visible { top: 0.0 });
        assert_eq!(tracker.active(), Some("a"));
        tracker.reset();
        assert_eq!(tracker.active(), None);
    }
}
