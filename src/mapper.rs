//! Result normalization.
//!
//! Turns a raw database record into a [`ResultItem`]. Every field is read
//! through an independent `Option` chain, so a partially populated or
//! oddly shaped record degrades to defaults instead of failing.
//!
//! | Field | Source property | Default |
//! |-------|-----------------|---------|
//! | `title` | `Name`, else `title` (first span) | `Untitled` |
//! | `category` | `Knowledge categories` (select / multi-select) | `Uncategorized` |
//! | `createdDate` | `Created Date`, else `Date`; then `Created time` | empty |
//! | `summary` | `Summary` (all spans) | `No summary available.` |

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::models::{RawRecord, ResultItem};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_SUMMARY: &str = "No summary available.";

/// Display format for system timestamps (`M/D/YYYY`).
const LOCALE_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Normalize one raw record into a result item.
pub fn normalize(record: &RawRecord) -> ResultItem {
    normalize_properties(&record.id, &record.properties)
}

/// Normalize a bare property bag, e.g. from a page-details response.
pub fn normalize_properties(id: &str, props: &Map<String, Value>) -> ResultItem {
    ResultItem {
        id: id.to_string(),
        title: extract_title(props).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        category: extract_category(props).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        created_date: extract_created_date(props).unwrap_or_default(),
        summary: extract_summary(props).unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
    }
}

fn extract_title(props: &Map<String, Value>) -> Option<String> {
    let prop = props.get("Name").or_else(|| props.get("title"))?;
    prop.get("title")?
        .get(0)?
        .get("plain_text")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn extract_category(props: &Map<String, Value>) -> Option<String> {
    let prop = props.get("Knowledge categories")?;

    if let Some(name) = prop
        .get("select")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
    {
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    let labels: Vec<&str> = prop
        .get("multi_select")?
        .as_array()?
        .iter()
        .filter_map(|opt| opt.get("name").and_then(Value::as_str))
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

fn extract_created_date(props: &Map<String, Value>) -> Option<String> {
    let prop = props.get("Created Date").or_else(|| props.get("Date"));

    if let Some(start) = prop
        .and_then(|p| p.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        return Some(start.to_string());
    }

    if let Some(ts) = prop
        .and_then(|p| p.get("created_time"))
        .and_then(Value::as_str)
    {
        return format_locale_date(ts);
    }

    props
        .get("Created time")
        .and_then(|p| p.get("created_time"))
        .and_then(Value::as_str)
        .and_then(format_locale_date)
}

fn extract_summary(props: &Map<String, Value>) -> Option<String> {
    let spans = props.get("Summary")?.get("rich_text")?.as_array()?;

    let first = spans.first()?.get("plain_text")?.as_str()?;
    if first.is_empty() {
        return None;
    }

    Some(
        spans
            .iter()
            .filter_map(|t| t.get("plain_text").and_then(Value::as_str))
            .collect(),
    )
}

/// Format an RFC 3339 timestamp as a locale-style date. Unparseable input
/// counts as absent.
fn format_locale_date(ts: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.format(LOCALE_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(properties: Value) -> RawRecord {
        serde_json::from_value(json!({
            "id": "page-1",
            "url": "https://www.notion.so/page-1",
            "properties": properties,
        }))
        .unwrap()
    }

    #[test]
    fn test_all_properties_missing_yields_defaults() {
        let item = normalize(&record(json!({})));
        assert_eq!(item.id, "page-1");
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.category, "Uncategorized");
        assert_eq!(item.created_date, "");
        assert_eq!(item.summary, "No summary available.");
    }

    #[test]
    fn test_record_without_properties_key() {
        let raw: RawRecord = serde_json::from_value(json!({ "id": "x" })).unwrap();
        let item = normalize(&raw);
        assert_eq!(item.title, DEFAULT_TITLE);
        assert_eq!(item.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn test_title_from_name_then_title() {
        let item = normalize(&record(json!({
            "Name": { "title": [{ "plain_text": "Black hole" }, { "plain_text": " ignored" }] }
        })));
        assert_eq!(item.title, "Black hole");

        let item = normalize(&record(json!({
            "title": { "title": [{ "plain_text": "Braneworld" }] }
        })));
        assert_eq!(item.title, "Braneworld");
    }

    #[test]
    fn test_title_wrong_shape_is_absent() {
        let item = normalize(&record(json!({ "Name": { "title": "not-an-array" } })));
        assert_eq!(item.title, "Untitled");

        let item = normalize(&record(json!({ "Name": { "title": [] } })));
        assert_eq!(item.title, "Untitled");
    }

    #[test]
    fn test_single_select_category() {
        let item = normalize(&record(json!({
            "Knowledge categories": { "select": { "name": "Physics" } }
        })));
        assert_eq!(item.category, "Physics");
    }

    #[test]
    fn test_multi_select_category_joined() {
        let item = normalize(&record(json!({
            "Knowledge categories": { "multi_select": [{ "name": "A" }, { "name": "B" }] }
        })));
        assert_eq!(item.category, "A, B");
    }

    #[test]
    fn test_empty_multi_select_defaults() {
        let item = normalize(&record(json!({
            "Knowledge categories": { "select": null, "multi_select": [] }
        })));
        assert_eq!(item.category, "Uncategorized");
    }

    #[test]
    fn test_date_start_preferred() {
        let item = normalize(&record(json!({
            "Created Date": { "date": { "start": "2024-03-01" }, "created_time": "2020-01-01T00:00:00.000Z" }
        })));
        assert_eq!(item.created_date, "2024-03-01");

        let item = normalize(&record(json!({ "Date": { "date": { "start": "2023-12-24" } } })));
        assert_eq!(item.created_date, "2023-12-24");
    }

    #[test]
    fn test_created_time_fallbacks() {
        let item = normalize(&record(json!({
            "Created Date": { "created_time": "2024-07-04T10:30:00.000Z" }
        })));
        assert_eq!(item.created_date, "7/4/2024");

        let item = normalize(&record(json!({
            "Created time": { "created_time": "2021-11-09T08:00:00.000Z" }
        })));
        assert_eq!(item.created_date, "11/9/2021");
    }

    #[test]
    fn test_unparseable_created_time_is_absent() {
        let item = normalize(&record(json!({
            "Created time": { "created_time": "yesterday" }
        })));
        assert_eq!(item.created_date, "");
    }

    #[test]
    fn test_summary_concatenates_spans() {
        let item = normalize(&record(json!({
            "Summary": { "rich_text": [{ "plain_text": "Emergent " }, { "plain_text": "property." }] }
        })));
        assert_eq!(item.summary, "Emergent property.");
    }

    #[test]
    fn test_summary_with_empty_first_span_defaults() {
        let item = normalize(&record(json!({
            "Summary": { "rich_text": [{ "plain_text": "" }, { "plain_text": "tail" }] }
        })));
        assert_eq!(item.summary, "No summary available.");
    }
}
