//! # KB Harness CLI (`kb`)
//!
//! Search, count, fetch and render documents from a Notion-backed knowledge
//! base, or serve them over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! kb --config ./config/kb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kb search "<query>"` | Search document titles |
//! | `kb stats` | Show the (capped) article count |
//! | `kb get <page-id>` | Load and render a document |
//! | `kb render <blocks.json>` | Render a local block tree |
//! | `kb serve` | Start the HTTP server |
//!
//! The Notion token is read from the environment variable named by
//! `notion.api_key_env` (default `NOTION_API_KEY`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kb_harness::{config, get, logging, render_cmd, search, server, stats};

/// KB Harness CLI: search and render a Notion knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/kb.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "kb",
    about = "KB Harness — search and render a Notion knowledge base",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kb.toml")]
    config: PathBuf,

    /// Enable debug logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Only log errors.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search document titles.
    ///
    /// Sends a title substring filter to the configured database and prints
    /// normalized result cards in store order.
    Search {
        /// The search query string.
        query: String,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the article count.
    ///
    /// The count is the length of the first result page and is capped at
    /// `notion.stats_page_size`.
    Stats,

    /// Load and render a document by page ID.
    Get {
        /// Notion page ID.
        id: String,

        /// Output format: `html`, `toc`, or `json`.
        #[arg(long, default_value = "html")]
        format: String,

        /// Color theme: `light` or `dark`.
        #[arg(long, default_value = "light")]
        theme: String,
    },

    /// Render a block tree stored as JSON.
    ///
    /// Accepts a bare array of block objects or a list response with a
    /// `results` array. Does not contact the store; works without a config
    /// file.
    Render {
        /// Path to the JSON block file.
        path: PathBuf,

        /// Color theme: `light` or `dark`.
        #[arg(long, default_value = "light")]
        theme: String,

        /// Prepend the table of contents.
        #[arg(long)]
        toc: bool,
    },

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let long_running = matches!(cli.command, Commands::Serve);
    logging::init_logging(logging::level_for(cli.verbose, cli.quiet, long_running))?;

    // `render` works without a config file
    let cfg = match &cli.command {
        Commands::Render { .. } if !cli.config.exists() => config::Config::minimal(),
        _ => config::load_config(&cli.config)?,
    };

    match cli.command {
        Commands::Search { query, json } => {
            search::run_search(&cfg, &query, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Get { id, format, theme } => {
            get::run_get(&cfg, &id, &format, &theme).await?;
        }
        Commands::Render { path, theme, toc } => {
            render_cmd::run_render(&cfg, &path, &theme, toc).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
