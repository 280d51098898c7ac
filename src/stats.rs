//! `kb stats`: article count for the configured database.
//!
//! The count is the length of the first result page, so it is capped at
//! `notion.stats_page_size`.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::knowledge::KnowledgeBase;

pub async fn run_stats(config: &Config) -> Result<()> {
    let kb = KnowledgeBase::from_config(config).context("Failed to create Notion client")?;
    let count = kb.article_count().await;
    let cap = config.notion.stats_page_size as usize;

    println!("Knowledge Base — Stats");
    println!("======================");
    println!();
    println!("  Store:       {}", kb.store_name());
    println!("  Database:    {}", config.notion.database_id);
    if count >= cap {
        println!("  Articles:    {}+", count);
    } else {
        println!("  Articles:    {}", count);
    }
    println!();

    Ok(())
}
