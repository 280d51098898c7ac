//! TOML configuration parsing.
//!
//! ```toml
//! [notion]
//! database_id = "0f3c..."
//! # api_key_env = "NOTION_API_KEY"
//! # search_page_size = 50
//!
//! [diagrams]
//! # endpoint = "https://kroki.io"
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Largest page size the Notion API accepts.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub notion: NotionConfig,
    #[serde(default)]
    pub diagrams: DiagramConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotionConfig {
    pub database_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Name of the environment variable holding the integration token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
    #[serde(default = "default_stats_page_size")]
    pub stats_page_size: u32,
    #[serde(default = "default_block_page_size")]
    pub block_page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Deepest level of nested children fetched for one document.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_api_base() -> String {
    "https://api.notion.com/v1".to_string()
}
fn default_api_version() -> String {
    "2022-06-28".to_string()
}
fn default_api_key_env() -> String {
    "NOTION_API_KEY".to_string()
}
fn default_search_page_size() -> u32 {
    50
}
fn default_stats_page_size() -> u32 {
    100
}
fn default_block_page_size() -> u32 {
    100
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_depth() -> usize {
    8
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            database_id: String::new(),
            api_base: default_api_base(),
            api_version: default_api_version(),
            api_key_env: default_api_key_env(),
            search_page_size: default_search_page_size(),
            stats_page_size: default_stats_page_size(),
            block_page_size: default_block_page_size(),
            timeout_secs: default_timeout_secs(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiagramConfig {
    /// Base URL of a Kroki-compatible service. Diagrams render as
    /// placeholders when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_diagram_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_diagram_timeout_secs() -> u64 {
    10
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_diagram_timeout_secs(),
        }
    }
}

impl DiagramConfig {
    pub fn is_enabled(&self) -> bool {
        self.endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Config {
    /// Configuration used by commands that never touch the store
    /// (e.g. `kb render`) when no config file is present.
    pub fn minimal() -> Self {
        Self {
            notion: NotionConfig::default(),
            diagrams: DiagramConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.notion.database_id.trim().is_empty() {
        anyhow::bail!("notion.database_id must not be empty");
    }

    for (name, value) in [
        ("notion.search_page_size", config.notion.search_page_size),
        ("notion.stats_page_size", config.notion.stats_page_size),
        ("notion.block_page_size", config.notion.block_page_size),
    ] {
        if value == 0 || value > MAX_PAGE_SIZE {
            anyhow::bail!("{} must be in [1, {}]", name, MAX_PAGE_SIZE);
        }
    }

    if config.notion.max_depth == 0 {
        anyhow::bail!("notion.max_depth must be >= 1");
    }

    if let Some(endpoint) = &config.diagrams.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!(
                "diagrams.endpoint must be an http(s) URL, got '{}'",
                endpoint
            );
        }
    }

    Ok(())
}
