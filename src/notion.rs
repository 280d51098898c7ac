//! Notion API client.
//!
//! Implements [`DocumentStore`] over the Notion REST API. Every request
//! carries a bearer token, the pinned `Notion-Version` header and a JSON
//! content type.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `search` | `POST databases/{db}/query` with a `Name` title filter |
//! | `count_all` | `POST databases/{db}/query`, unfiltered |
//! | `fetch_blocks` | `GET blocks/{id}/children`, following `next_cursor` |
//! | `fetch_details` | `GET pages/{id}` |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::blocks::{ContentBlock, Icon};
use crate::config::NotionConfig;
use crate::error::StoreError;
use crate::models::{PageDetails, RawRecord};
use crate::traits::DocumentStore;

/// Credential values containing this marker are treated as unset.
const PLACEHOLDER_MARKER: &str = "PLACEHOLDER";

/// Upper bound on block pages followed for one parent.
const MAX_BLOCK_PAGES: usize = 1000;

pub struct NotionClient {
    client: reqwest::Client,
    api_base: String,
    api_version: String,
    database_id: String,
    token: String,
    search_page_size: u32,
    stats_page_size: u32,
    block_page_size: u32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct BlockListResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    cover: Option<Value>,
    #[serde(default)]
    icon: Option<Value>,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl NotionClient {
    /// Build a client, reading the token from `config.api_key_env`.
    pub fn new(config: &NotionConfig) -> Result<Self, StoreError> {
        let token = std::env::var(&config.api_key_env)
            .ok()
            .filter(|t| usable_token(t))
            .ok_or_else(|| StoreError::MissingCredential(config.api_key_env.clone()))?;
        Self::with_token(config, token)
    }

    /// Build a client with an explicit token.
    pub fn with_token(config: &NotionConfig, token: impl Into<String>) -> Result<Self, StoreError> {
        let token = token.into();
        if !usable_token(&token) {
            return Err(StoreError::MissingCredential(config.api_key_env.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            database_id: config.database_id.clone(),
            token,
            search_page_size: config.search_page_size,
            stats_page_size: config.stats_page_size,
            block_page_size: config.block_page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", &self.api_version)
            .header("Content-Type", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, StoreError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn query_database(&self, body: Value) -> Result<Vec<RawRecord>, StoreError> {
        let path = format!("databases/{}/query", self.database_id);
        let resp: QueryResponse = self
            .send(self.request(reqwest::Method::POST, &path).json(&body))
            .await?;
        Ok(resp.results)
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>, StoreError> {
        let body = json!({
            "filter": {
                "or": [
                    { "property": "Name", "title": { "contains": query } }
                ]
            },
            "page_size": self.search_page_size,
        });
        let results = self.query_database(body).await?;
        tracing::debug!(query, hits = results.len(), "database query");
        Ok(results)
    }

    async fn count_all(&self) -> Result<usize, StoreError> {
        let results = self
            .query_database(json!({ "page_size": self.stats_page_size }))
            .await?;
        Ok(results.len())
    }

    async fn fetch_blocks(&self, block_id: &str) -> Result<Vec<ContentBlock>, StoreError> {
        let path = format!("blocks/{}/children", checked_id(block_id)?);
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_BLOCK_PAGES {
            let mut req = self
                .request(reqwest::Method::GET, &path)
                .query(&[("page_size", self.block_page_size.to_string())]);
            if let Some(c) = &cursor {
                req = req.query(&[("start_cursor", c.as_str())]);
            }

            let page: BlockListResponse = self.send(req).await?;
            blocks.extend(page.results.iter().map(ContentBlock::from_value));

            match page.next_cursor {
                Some(next) if page.has_more && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next);
                }
                _ => return Ok(blocks),
            }
        }

        tracing::warn!(block_id, pages = MAX_BLOCK_PAGES, "block pagination limit reached");
        Ok(blocks)
    }

    async fn fetch_details(&self, page_id: &str) -> Result<PageDetails, StoreError> {
        let path = format!("pages/{}", checked_id(page_id)?);
        let page: PageResponse = self
            .send(self.request(reqwest::Method::GET, &path))
            .await?;

        Ok(PageDetails {
            cover: page.cover.as_ref().and_then(file_object_url),
            icon: page.icon.as_ref().and_then(Icon::from_value),
            properties: page.properties,
        })
    }
}

/// Ids are interpolated into request paths, so only ASCII alphanumerics and
/// dashes are accepted. Notion ids are UUIDs with or without dashes.
fn checked_id(id: &str) -> Result<&str, StoreError> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(id)
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

fn usable_token(token: &str) -> bool {
    !token.trim().is_empty() && !token.contains(PLACEHOLDER_MARKER)
}

/// URL of a `{ "type": "external" | "file", <type>: { "url": ... } }` object.
fn file_object_url(value: &Value) -> Option<String> {
    let tag = value.get("type")?.as_str()?;
    value
        .get(tag)?
        .get("url")?
        .as_str()
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> NotionConfig {
        NotionConfig {
            database_id: "db-1".to_string(),
            api_base: server.uri(),
            ..NotionConfig::default()
        }
    }

    fn paragraph(id: &str, text: &str) -> Value {
        json!({
            "object": "block", "id": id, "type": "paragraph", "has_children": false,
            "paragraph": { "rich_text": [{ "plain_text": text }] }
        })
    }

    #[tokio::test]
    async fn test_search_sends_title_filter_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db-1/query"))
            .and(header("Authorization", "Bearer secret_abc"))
            .and(header("Notion-Version", "2022-06-28"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "filter": { "or": [{ "property": "Name", "title": { "contains": "black hole" } }] },
                "page_size": 50
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [
                    { "id": "p1", "url": "https://notion.so/p1", "properties": {} },
                    { "id": "p2", "properties": { "Name": { "title": [{ "plain_text": "Black hole" }] } } }
                ],
                "has_more": true,
                "next_cursor": "ignored"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret_abc").unwrap();
        let results = client.search("black hole").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "p1");
        assert_eq!(results[1].url, "");
    }

    #[tokio::test]
    async fn test_count_all_is_capped_page_length() {
        let server = MockServer::start().await;
        let results: Vec<Value> = (0..3).map(|i| json!({ "id": format!("p{}", i) })).collect();
        Mock::given(method("POST"))
            .and(path("/databases/db-1/query"))
            .and(body_json(json!({ "page_size": 100 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": results, "has_more": true, "next_cursor": "c2"
            })))
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        assert_eq!(client.count_all().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_fetch_blocks_follows_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks/root/children"))
            .and(query_param("start_cursor", "c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [paragraph("b3", "three")], "has_more": false, "next_cursor": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blocks/root/children"))
            .and(query_param("page_size", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [paragraph("b1", "one"), paragraph("b2", "two")],
                "has_more": true, "next_cursor": "c2"
            })))
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        let blocks = client.fetch_blocks("root").await.unwrap();
        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "b3"]);
        assert!(matches!(blocks[0].kind, BlockKind::Paragraph(_)));
    }

    #[tokio::test]
    async fn test_fetch_details_reads_cover_and_icon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pages/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p1",
                "cover": { "type": "external", "external": { "url": "https://img.example/c.jpg" } },
                "icon": { "type": "emoji", "emoji": "🪐" },
                "properties": { "Name": { "title": [{ "plain_text": "Saturn" }] } }
            })))
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        let details = client.fetch_details("p1").await.unwrap();
        assert_eq!(details.cover.as_deref(), Some("https://img.example/c.jpg"));
        assert_eq!(details.icon, Some(Icon::Emoji("🪐".to_string())));
        assert!(details.properties.contains_key("Name"));
    }

    #[tokio::test]
    async fn test_api_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pages/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("object_not_found"))
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        match client.fetch_details("missing").await {
            Err(StoreError::Api { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "object_not_found");
            }
            other => panic!("expected api error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_path_like_ids_never_reach_the_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "user" })))
            .expect(0)
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        for id in ["../users/me", "..", "a/b", "p1?x=1", "p1%2F..", ""] {
            assert!(
                matches!(client.fetch_details(id).await, Err(StoreError::InvalidId(_))),
                "fetch_details accepted {:?}",
                id
            );
            assert!(
                matches!(client.fetch_blocks(id).await, Err(StoreError::InvalidId(_))),
                "fetch_blocks accepted {:?}",
                id
            );
        }
    }

    #[tokio::test]
    async fn test_dashed_uuid_ids_are_accepted() {
        let server = MockServer::start().await;
        let id = "0f3c1a2b-3c4d-5e6f-7a8b-9c0d1e2f3a4b";
        Mock::given(method("GET"))
            .and(path(format!("/pages/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NotionClient::with_token(&config(&server), "secret").unwrap();
        let details = client.fetch_details(id).await.unwrap();
        assert!(details.cover.is_none());
    }

    #[test]
    fn test_placeholder_token_is_missing_credential() {
        let cfg = NotionConfig::default();
        assert!(matches!(
            NotionClient::with_token(&cfg, "PLACEHOLDER_API_KEY"),
            Err(StoreError::MissingCredential(_))
        ));
        assert!(matches!(
            NotionClient::with_token(&cfg, "  "),
            Err(StoreError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_unset_env_var_is_missing_credential() {
        let cfg = NotionConfig {
            api_key_env: "KB_HARNESS_TEST_UNSET_TOKEN".to_string(),
            ..NotionConfig::default()
        };
        match NotionClient::new(&cfg) {
            Err(StoreError::MissingCredential(var)) => {
                assert_eq!(var, "KB_HARNESS_TEST_UNSET_TOKEN")
            }
            _ => panic!("expected missing credential"),
        }
    }
}
