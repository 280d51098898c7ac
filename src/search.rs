//! `kb search`: title search against the configured database.
//!
//! Search is delegated to the store's substring filter; results are printed
//! in store order.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::models::ResultItem;

/// Search response shape shared by `kb search --json` and `GET /api/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<ResultItem>,
}

impl SearchResponse {
    pub fn new(query: &str, results: Vec<ResultItem>) -> Self {
        Self {
            query: query.to_string(),
            count: results.len(),
            results,
        }
    }
}

pub async fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let kb = KnowledgeBase::from_config(config).context("Failed to create Notion client")?;
    let results = kb.query(query).await;

    if json {
        let response = SearchResponse::new(query, results);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    print_results(&results);
    Ok(())
}

fn print_results(results: &[ResultItem]) {
    for (i, item) in results.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, item.title, item.category);
        if !item.created_date.is_empty() {
            println!("    created: {}", item.created_date);
        }
        println!("    summary: \"{}\"", item.summary.replace('\n', " ").trim());
        println!("    id: {}", item.id);
        println!();
    }
}
