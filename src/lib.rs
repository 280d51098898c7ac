//! # KB Harness
//!
//! A search front end and renderer for a knowledge base kept in a Notion
//! database.
//!
//! A title query goes to the store through a thin client that forwards a
//! static credential and a pinned API version. Hits are normalized into
//! uniform result items. A selected page's nested block tree is fetched
//! recursively and rendered to HTML together with a table of contents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ DocumentStore│──▶│    Mapper    │──▶│ ResultItem[] │
//! │   (Notion)   │   └──────────────┘   └──────────────┘
//! │              │   ┌──────────────┐   ┌──────────────┐
//! │              │──▶│  Tree fetch  │──▶│   Renderer   │──▶ HTML + TOC
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              ▼
//!                                     ┌─────────────────┐
//!                                     │ DiagramRenderer │
//!                                     └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export NOTION_API_KEY=secret_...
//! kb search "black hole"
//! kb stats
//! kb get <page-id> --format toc
//! kb render blocks.json --theme dark
//! kb serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Page-level data types |
//! | [`blocks`] | Typed block model |
//! | [`mapper`] | Raw record → result item |
//! | [`render`] | Block tree → HTML |
//! | [`toc`] | Heading extraction and active-section tracking |
//! | [`diagram`] | Diagram rendering collaborator |
//! | [`traits`] | `DocumentStore` extension seam |
//! | [`notion`] | Notion API client |
//! | [`knowledge`] | Search, count, load and render service |
//! | [`server`] | HTTP server |

pub mod blocks;
pub mod config;
pub mod diagram;
pub mod error;
pub mod get;
pub mod knowledge;
pub mod logging;
pub mod mapper;
pub mod models;
pub mod notion;
pub mod render;
pub mod render_cmd;
pub mod search;
pub mod server;
pub mod stats;
pub mod toc;
pub mod traits;
